//! Shared fetch-and-extract path for the report commands.

use chrono::Local;
use epr_data::{Extractor, GridLayout, MetricRequest, MetricSeries};
use epr_sheet::client::SheetClient;
use epr_sheet::period::PeriodCode;
use epr_sheet::report::ReportPage;
use log::info;

/// Default period floor: January of the current ROC year.
pub fn default_floor() -> String {
    let today = Local::now().naive_local().date();
    PeriodCode::year_start(today).to_string()
}

/// Fetch a page's grid and extract its metric series.
///
/// The request is built from the catalog before the fetch, so a bad catalog
/// entry fails without touching the network. Source errors propagate
/// unchanged.
pub async fn fetch_series(
    doc: &str,
    page: &ReportPage,
    floor: &str,
) -> anyhow::Result<MetricSeries> {
    let request = MetricRequest::new(
        page.metrics.iter().map(|m| m.semantic_row).collect(),
        page.metrics.iter().map(|m| m.name.clone()).collect(),
    )?;

    let mut client = SheetClient::new(doc)?;
    let grid = client.fetch_grid(&page.gid).await?;

    let layout = GridLayout::default();
    layout.validate_against(&grid)?;

    info!(
        "extracting {} metrics from tab {} ({} rows, floor {})",
        page.metrics.len(),
        page.gid,
        grid.row_count(),
        floor
    );
    let series = Extractor::new(layout).extract(&grid, &request, floor)?;
    Ok(series)
}
