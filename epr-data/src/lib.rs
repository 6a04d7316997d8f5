//! Tabular metric extraction for environmental report grids.
//!
//! Turns a raw spreadsheet grid (period labels across the header, metric
//! rows below) into a clean time-series table: one row per period at or
//! after a floor, one column per requested metric. Pure transforms only;
//! fetching lives in `epr-sheet`.

pub mod extract;
pub mod series;

pub use extract::{ExtractError, Extractor, GridLayout, MetricRequest};
pub use series::{MetricColumn, MetricSeries};
