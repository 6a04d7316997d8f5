use crate::series::{MetricColumn, MetricSeries};
use epr_sheet::grid::RawGrid;
use log::debug;
use thiserror::Error;

/// Errors from building a metric request or running an extraction.
#[derive(Error, Debug, PartialEq)]
pub enum ExtractError {
    /// Selector and name lists disagree. A configuration error: surfaced
    /// before any grid is fetched or touched.
    #[error("selector/name arity mismatch (selectors: {selectors}, names: {names})")]
    ArityMismatch { selectors: usize, names: usize },

    #[error("no metrics requested")]
    EmptyRequest,

    /// The grid is smaller than the largest requested row. `available`
    /// counts data rows, header excluded.
    #[error("grid too small for requested rows (required {required}, have {available})")]
    InsufficientRows { required: u32, available: usize },

    #[error("row selector {selector} is below the layout offset {offset}")]
    SelectorUnderflow { selector: u32, offset: u32 },

    #[error("layout validation sample has no header row")]
    EmptySample,

    #[error("layout with offset {offset} finds no data rows in a {rows}-row sample")]
    SampleTooShallow { offset: u32, rows: usize },
}

/// Mapping from 1-based sheet row numbers to 0-based grid storage rows.
///
/// The published report keeps its period labels in sheet row 1, so with the
/// default offset of 1 that row lands at storage index 0 and a metric at
/// sheet row 31 at storage index 30. The offset is fixed here, once per
/// source/layout pairing; call sites never adjust row numbers themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    row_offset: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { row_offset: 1 }
    }
}

impl GridLayout {
    pub fn with_offset(row_offset: u32) -> Self {
        Self { row_offset }
    }

    pub fn row_offset(&self) -> u32 {
        self.row_offset
    }

    /// Storage index for a 1-based sheet row, or `None` when the selector
    /// sits above the offset.
    pub fn storage_row(&self, semantic_row: u32) -> Option<usize> {
        semantic_row
            .checked_sub(self.row_offset)
            .map(|v| v as usize)
    }

    /// Sanity-check the layout against a known-good sample grid at startup:
    /// the mapped header position must carry period labels, and the first
    /// data row under the offset (sheet row `offset + 1`, storage row 1)
    /// must land inside the sample.
    pub fn validate_against(&self, sample: &RawGrid) -> Result<(), ExtractError> {
        if sample.header().is_empty() {
            return Err(ExtractError::EmptySample);
        }
        let first_data = self
            .row_offset
            .checked_add(1)
            .and_then(|row| self.storage_row(row));
        match first_data {
            Some(storage) if storage < sample.row_count() => Ok(()),
            _ => Err(ExtractError::SampleTooShallow {
                offset: self.row_offset,
                rows: sample.row_count(),
            }),
        }
    }
}

/// A validated, parallel set of row selectors and output names.
///
/// Construction checks arity, so a configuration error surfaces before any
/// grid is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRequest {
    selectors: Vec<u32>,
    names: Vec<String>,
}

impl MetricRequest {
    pub fn new(selectors: Vec<u32>, names: Vec<String>) -> Result<Self, ExtractError> {
        if selectors.len() != names.len() {
            return Err(ExtractError::ArityMismatch {
                selectors: selectors.len(),
                names: names.len(),
            });
        }
        if selectors.is_empty() {
            return Err(ExtractError::EmptyRequest);
        }
        Ok(Self { selectors, names })
    }

    pub fn selectors(&self) -> &[u32] {
        &self.selectors
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    fn max_selector(&self) -> u32 {
        self.selectors.iter().copied().max().unwrap_or(0)
    }
}

/// The tabular metric extractor.
///
/// Given a raw grid, a metric request and a period floor, produces a
/// [`MetricSeries`]: one row per header label stringwise `>=` the floor, one
/// column per requested metric. The floor comparison is plain text, never
/// date logic; the report's fixed-width zero-padded codes are what make
/// lexicographic order match calendar order.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    layout: GridLayout,
}

impl Extractor {
    pub fn new(layout: GridLayout) -> Self {
        Self { layout }
    }

    /// Run an extraction. Pure and idempotent; the only recoverable failure
    /// is a single bad value cell, which becomes `None` in place.
    pub fn extract(
        &self,
        grid: &RawGrid,
        request: &MetricRequest,
        period_floor: &str,
    ) -> Result<MetricSeries, ExtractError> {
        // Shape checks before any row access.
        let available = grid.row_count().saturating_sub(1);
        let required = request.max_selector();
        if available < required as usize {
            return Err(ExtractError::InsufficientRows {
                required,
                available,
            });
        }
        for &selector in request.selectors() {
            if selector < self.layout.row_offset() {
                return Err(ExtractError::SelectorUnderflow {
                    selector,
                    offset: self.layout.row_offset(),
                });
            }
        }

        let header = grid.header();
        let keep: Vec<bool> = header
            .iter()
            .map(|label| label.as_str() >= period_floor)
            .collect();
        let periods: Vec<String> = header
            .iter()
            .zip(&keep)
            .filter(|(_, &k)| k)
            .map(|(label, _)| label.clone())
            .collect();

        let mut columns = Vec::with_capacity(request.len());
        for (&selector, name) in request.selectors().iter().zip(request.names()) {
            // Underflow was rejected above, so the subtraction holds.
            let storage = selector as usize - self.layout.row_offset() as usize;
            let values: Vec<Option<f64>> = grid
                .data_cells(storage)
                .into_iter()
                .zip(&keep)
                .filter(|(_, &k)| k)
                .map(|(cell, _)| parse_value(cell))
                .collect();
            debug_assert_eq!(values.len(), periods.len());
            columns.push(MetricColumn {
                name: name.clone(),
                values,
            });
        }

        debug!(
            "extracted {} columns x {} periods (floor {})",
            columns.len(),
            periods.len(),
            period_floor
        );
        Ok(MetricSeries { periods, columns })
    }
}

/// Strip grouping separators and parse a value cell.
///
/// `None` for anything that still fails to parse; a bad cell never aborts
/// the extraction.
fn parse_value(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod test {
    use super::{ExtractError, Extractor, GridLayout, MetricRequest};
    use epr_sheet::grid::RawGrid;

    fn grid_from(rows: Vec<Vec<&str>>) -> RawGrid {
        RawGrid::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    /// A grid shaped like the waste-byproducts tab: period labels in sheet
    /// row 1, metric values at sheet rows 31, 36 and 40.
    fn waste_grid() -> RawGrid {
        let mut rows: Vec<Vec<String>> = (0..41).map(|_| vec![String::new()]).collect();
        let set = |rows: &mut Vec<Vec<String>>, storage: usize, cells: &[&str]| {
            rows[storage] = cells.iter().map(|s| s.to_string()).collect();
        };
        set(&mut rows, 0, &["Item", "113.12", "114.01", "114.02"]);
        set(&mut rows, 30, &["Mixed plastic waste", "1,234", "1,300", "1,280"]);
        set(&mut rows, 35, &["Plastic waste", "410", "N/A", "455"]);
        set(&mut rows, 39, &["Organic sludge", "88.5", "90.1", ""]);
        RawGrid::new(rows)
    }

    fn waste_request() -> MetricRequest {
        MetricRequest::new(
            vec![31, 36, 40],
            vec![
                "Mixed plastic waste".into(),
                "Plastic waste".into(),
                "Organic sludge".into(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_extract_waste_page() {
        let extractor = Extractor::new(GridLayout::default());
        let series = extractor
            .extract(&waste_grid(), &waste_request(), "114.01")
            .unwrap();

        assert_eq!(series.periods, ["114.01", "114.02"]);
        assert_eq!(series.columns.len(), 3);
        assert_eq!(
            series.column("Mixed plastic waste").unwrap().values,
            [Some(1300.0), Some(1280.0)]
        );
    }

    #[test]
    fn test_period_floor_is_lexicographic_and_inclusive() {
        // "113.12" < "114.01" as plain text; exactly the last two survive.
        let extractor = Extractor::new(GridLayout::default());
        let series = extractor
            .extract(&waste_grid(), &waste_request(), "114.01")
            .unwrap();
        assert_eq!(series.periods, ["114.01", "114.02"]);

        let all = extractor
            .extract(&waste_grid(), &waste_request(), "113.01")
            .unwrap();
        assert_eq!(all.periods, ["113.12", "114.01", "114.02"]);
    }

    #[test]
    fn test_order_preserved_and_columns_aligned() {
        let extractor = Extractor::new(GridLayout::default());
        let series = extractor
            .extract(&waste_grid(), &waste_request(), "")
            .unwrap();
        assert_eq!(series.periods, ["113.12", "114.01", "114.02"]);
        for column in &series.columns {
            assert_eq!(column.values.len(), series.len());
        }
    }

    #[test]
    fn test_idempotent() {
        let extractor = Extractor::new(GridLayout::default());
        let a = extractor
            .extract(&waste_grid(), &waste_request(), "114.01")
            .unwrap();
        let b = extractor
            .extract(&waste_grid(), &waste_request(), "114.01")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_cell_is_isolated() {
        let extractor = Extractor::new(GridLayout::default());
        let series = extractor
            .extract(&waste_grid(), &waste_request(), "113.01")
            .unwrap();
        // "N/A" at 114.01 only; neighbours unaffected.
        assert_eq!(
            series.column("Plastic waste").unwrap().values,
            [Some(410.0), None, Some(455.0)]
        );
        // Empty cell parses to None as well.
        assert_eq!(
            series.column("Organic sludge").unwrap().values,
            [Some(88.5), Some(90.1), None]
        );
    }

    #[test]
    fn test_thousands_separators_stripped() {
        let grid = grid_from(vec![
            vec!["Item", "114.01"],
            vec!["Throughput", "12,345"],
            vec!["", ""],
        ]);
        let request = MetricRequest::new(vec![2], vec!["Throughput".into()]).unwrap();
        let series = Extractor::new(GridLayout::default())
            .extract(&grid, &request, "114.01")
            .unwrap();
        assert_eq!(series.columns[0].values, [Some(12345.0)]);
    }

    #[test]
    fn test_arity_mismatch_fails_at_construction() {
        let err = MetricRequest::new(vec![30, 31], vec!["A".into()]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::ArityMismatch {
                selectors: 2,
                names: 1
            }
        );
        assert_eq!(
            MetricRequest::new(vec![], vec![]).unwrap_err(),
            ExtractError::EmptyRequest
        );
    }

    #[test]
    fn test_insufficient_rows_reports_shape() {
        // Header + 10 data rows, but row 30 requested.
        let mut rows = vec![vec!["Item", "114.01"]];
        for _ in 0..10 {
            rows.push(vec!["x", "1"]);
        }
        let grid = grid_from(rows);
        let request = MetricRequest::new(vec![30], vec!["A".into()]).unwrap();
        let err = Extractor::new(GridLayout::default())
            .extract(&grid, &request, "114.01")
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::InsufficientRows {
                required: 30,
                available: 10
            }
        );
        assert_eq!(
            err.to_string(),
            "grid too small for requested rows (required 30, have 10)"
        );
    }

    #[test]
    fn test_selector_underflow() {
        let grid = grid_from(vec![vec!["Item", "114.01"], vec!["x", "1"]]);
        let request = MetricRequest::new(vec![1], vec!["A".into()]).unwrap();
        let err = Extractor::new(GridLayout::with_offset(2))
            .extract(&grid, &request, "")
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::SelectorUnderflow {
                selector: 1,
                offset: 2
            }
        );
    }

    #[test]
    fn test_layout_validation() {
        let layout = GridLayout::default();
        assert!(layout.validate_against(&waste_grid()).is_ok());
        assert_eq!(
            layout.validate_against(&RawGrid::new(vec![])).unwrap_err(),
            ExtractError::EmptySample
        );
        assert_eq!(layout.storage_row(31), Some(30));
    }

    #[test]
    fn test_layout_validation_needs_a_data_row() {
        // A header-only sample cannot anchor the offset.
        let header_only = grid_from(vec![vec!["Item", "114.01", "114.02"]]);
        assert_eq!(
            GridLayout::default()
                .validate_against(&header_only)
                .unwrap_err(),
            ExtractError::SampleTooShallow { offset: 1, rows: 1 }
        );
    }
}
