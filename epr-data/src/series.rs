use serde::Serialize;

/// One extracted metric column, positionally aligned with the period column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricColumn {
    pub name: String,
    /// `None` marks a cell that failed numeric parsing.
    pub values: Vec<Option<f64>>,
}

/// A clean time-series table: one shared period column plus one value column
/// per requested metric, all the same length, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct MetricSeries {
    pub periods: Vec<String>,
    pub columns: Vec<MetricColumn>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&MetricColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Most recent period label, if any periods survived the filter.
    pub fn latest_period(&self) -> Option<&str> {
        self.periods.last().map(String::as_str)
    }

    /// (name, most recent value) per column, for summary headers.
    pub fn latest_values(&self) -> Vec<(&str, Option<f64>)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.values.last().copied().flatten()))
            .collect()
    }

    /// Min and max over every present value, for chart axis bounds.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for column in &self.columns {
            for v in column.values.iter().flatten() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                    None => (*v, *v),
                });
            }
        }
        range
    }
}
