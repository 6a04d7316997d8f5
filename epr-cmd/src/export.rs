//! Export a report page's series to CSV.

use crate::report::fetch_series;
use csv::WriterBuilder;
use epr_sheet::report::ReportPage;
use log::info;

pub async fn run_export(
    doc: &str,
    page_key: &str,
    since: &str,
    output: &str,
) -> anyhow::Result<()> {
    let page = ReportPage::find(page_key)?;
    let series = fetch_series(doc, &page, since).await?;

    let mut wtr = WriterBuilder::new().from_path(output)?;
    let mut header = vec!["period".to_string()];
    header.extend(series.columns.iter().map(|c| c.name.clone()));
    wtr.write_record(&header)?;

    for i in 0..series.len() {
        let mut record = vec![series.periods[i].clone()];
        for column in &series.columns {
            record.push(
                column.values[i]
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    info!("wrote {} periods to {}", series.len(), output);
    Ok(())
}
