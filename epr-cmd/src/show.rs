//! Print a report page as a latest-period summary plus an aligned table.

use crate::report::fetch_series;
use epr_sheet::report::ReportPage;

/// List the catalog: page keys, titles and metric rows.
pub fn run_pages() -> anyhow::Result<()> {
    for page in ReportPage::catalog()? {
        println!("{:<12} {}", page.key, page.title);
        for metric in &page.metrics {
            println!("    A{:<4} {} ({})", metric.semantic_row, metric.name, metric.unit);
        }
    }
    Ok(())
}

pub async fn run_show(doc: &str, page_key: &str, since: &str, json: bool) -> anyhow::Result<()> {
    let page = ReportPage::find(page_key)?;
    let series = fetch_series(doc, &page, since).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    if series.is_empty() {
        println!("No periods at or after {} for '{}'.", since, page.title);
        return Ok(());
    }

    // Latest-period summary, one line per metric.
    println!(
        "{} — latest period {}",
        page.title,
        series.latest_period().unwrap_or("-")
    );
    for (metric, (name, value)) in page.metrics.iter().zip(series.latest_values()) {
        match value {
            Some(v) => println!("  {:<24} {:>12.2} {}", name, v, metric.unit),
            None => println!("  {:<24} {:>12} {}", name, "-", metric.unit),
        }
    }
    println!();

    // Full table, periods down, metrics across.
    print!("{:<10}", "Period");
    for column in &series.columns {
        print!(" {:>20}", column.name);
    }
    println!();
    println!("{}", "-".repeat(10 + 21 * series.columns.len()));
    for (i, period) in series.periods.iter().enumerate() {
        print!("{:<10}", period);
        for column in &series.columns {
            match column.values[i] {
                Some(v) => print!(" {:>20.2}", v),
                None => print!(" {:>20}", "-"),
            }
        }
        println!();
    }
    Ok(())
}
