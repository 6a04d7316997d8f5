//! Core types for the plant environmental report toolkit.
//!
//! The monthly report lives in a published spreadsheet: one tab per report
//! page (wastewater, air emissions, waste byproducts, raw materials, product
//! output), period labels across the header row, metric rows below. This
//! crate holds the raw grid type, the ROC-calendar period codes used as
//! column labels, the page/metric catalog, and (behind the `api` feature)
//! the HTTP client that fetches a tab as CSV.

pub mod grid;
pub mod period;
pub mod report;

#[cfg(feature = "api")]
pub mod client;
