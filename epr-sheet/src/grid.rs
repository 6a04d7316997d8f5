use csv::ReaderBuilder;

/// A raw spreadsheet grid: ordered rows of text cells.
///
/// Storage row 0 is the header row: column 0 holds a corner label, columns
/// 1..N hold period labels (e.g. `"114.01"`). The rows below hold metric
/// values as text, exactly as published: thousands separators, blanks and
/// stray annotations included. Cleaning is the extractor's job, not ours.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Parse a published-CSV body into a grid.
    ///
    /// Read headerless and flexible: the published sheet has ragged row
    /// widths, and the header row is data to us.
    pub fn parse_csv(body: &str) -> Result<Self, csv::Error> {
        let mut rows = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body.as_bytes());
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at (row, col), or `""` when the row is absent or shorter.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Period labels: header row, columns 1..N.
    pub fn header(&self) -> &[String] {
        match self.rows.first() {
            Some(row) if row.len() > 1 => &row[1..],
            _ => &[],
        }
    }

    /// Width of the label/value area (columns 1..N), from the header row.
    pub fn period_count(&self) -> usize {
        self.header().len()
    }

    /// Value cells of a storage row, columns 1..N, padded with `""` to the
    /// header width so every metric row aligns with the period labels.
    pub fn data_cells(&self, storage_row: usize) -> Vec<&str> {
        let width = self.period_count();
        (0..width).map(|i| self.cell(storage_row, i + 1)).collect()
    }
}
