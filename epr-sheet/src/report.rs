use anyhow::Context;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded catalog of report pages and their metric rows.
pub static CATALOG_CSV: &str = include_str!("../../fixtures/report_pages.csv");

/// One metric on a report page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDef {
    /// 1-based row number in the published sheet layout: the number a human
    /// reads next to the metric label, e.g. A31.
    pub semantic_row: u32,
    pub name: String,
    pub unit: String,
}

/// A report page: one tab of the published spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    /// Short key used on the command line, e.g. "waste".
    pub key: String,
    /// Tab id within the published document.
    pub gid: String,
    pub title: String,
    pub metrics: Vec<MetricDef>,
}

impl ReportPage {
    /// Parse the embedded catalog into pages, preserving fixture order.
    pub fn catalog() -> anyhow::Result<Vec<ReportPage>> {
        Self::parse_catalog(CATALOG_CSV)
    }

    /// Look up a page by its key.
    pub fn find(key: &str) -> anyhow::Result<ReportPage> {
        Self::catalog()?
            .into_iter()
            .find(|p| p.key == key)
            .with_context(|| format!("unknown report page '{}'", key))
    }

    /// Parse a catalog CSV (`page,gid,title,row,metric,unit`) into pages.
    /// Consecutive records with the same page key are grouped.
    pub fn parse_catalog(csv_data: &str) -> anyhow::Result<Vec<ReportPage>> {
        let mut pages: Vec<ReportPage> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_data.as_bytes());

        for result in rdr.records() {
            let record = result?;
            let key = record.get(0).context("catalog record missing page key")?;
            let gid = record.get(1).context("catalog record missing gid")?;
            let title = record.get(2).context("catalog record missing title")?;
            let row: u32 = record
                .get(3)
                .context("catalog record missing row")?
                .trim()
                .parse()
                .with_context(|| format!("bad row number in catalog for page '{}'", key))?;
            let name = record.get(4).context("catalog record missing metric")?;
            let unit = record.get(5).unwrap_or("").to_string();

            let metric = MetricDef {
                semantic_row: row,
                name: name.to_string(),
                unit,
            };

            match pages.last_mut() {
                Some(page) if page.key == key => page.metrics.push(metric),
                _ => pages.push(ReportPage {
                    key: key.to_string(),
                    gid: gid.to_string(),
                    title: title.to_string(),
                    metrics: vec![metric],
                }),
            }
        }

        Ok(pages)
    }
}
