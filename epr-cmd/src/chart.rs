//! Render a report page as a PNG line chart.

use crate::report::fetch_series;
use anyhow::Context;
use epr_data::{MetricColumn, MetricSeries};
use epr_sheet::report::ReportPage;
use log::info;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (1024, 600);

pub async fn run_chart(
    doc: &str,
    page_key: &str,
    metric: Option<&str>,
    since: &str,
    output: &str,
) -> anyhow::Result<()> {
    let page = ReportPage::find(page_key)?;
    let series = fetch_series(doc, &page, since).await?;
    anyhow::ensure!(
        !series.is_empty(),
        "no periods at or after {} for '{}'",
        since,
        page.title
    );

    let columns: Vec<&MetricColumn> = match metric {
        Some(name) => vec![series.column(name).with_context(|| {
            format!("metric '{}' is not on page '{}'", name, page.key)
        })?],
        None => series.columns.iter().collect(),
    };

    render_line_chart(&page.title, &series, &columns, output)?;
    info!("wrote chart to {}", output);
    Ok(())
}

fn render_line_chart(
    title: &str,
    series: &MetricSeries,
    columns: &[&MetricColumn],
    output: &str,
) -> anyhow::Result<()> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for column in columns {
        for v in column.values.iter().flatten() {
            lo = lo.min(*v);
            hi = hi.max(*v);
        }
    }
    anyhow::ensure!(lo.is_finite(), "no numeric values to chart");
    let pad = ((hi - lo) * 0.05).max(1.0);
    let y_range = (lo - pad)..(hi + pad);
    // Index-based x axis, labelled with the period codes.
    let x_range = -0.5..(series.len() as f64 - 0.5);

    let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    let periods = &series.periods;
    chart
        .configure_mesh()
        .x_labels(periods.len().min(12))
        .x_label_formatter(&|x: &f64| {
            let idx = x.round();
            if idx < 0.0 {
                return String::new();
            }
            periods.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_desc("Value")
        .draw()?;

    for (i, column) in columns.iter().enumerate() {
        let color = Palette99::pick(i);
        chart
            .draw_series(LineSeries::new(
                column
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(x, v)| v.map(|y| (x as f64, y))),
                color.stroke_width(2),
            ))?
            .label(column.name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.4))
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
