use crate::grid::RawGrid;
use log::{debug, info};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Base URL for a published spreadsheet document.
const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// How long a fetched grid stays fresh before the next call re-fetches it.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the published-sheet grid source.
///
/// Surfaced verbatim to callers; retry policy, if any, belongs to whoever
/// drives the client.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bad response status {status} for tab {gid}")]
    Status { gid: String, status: u16 },

    #[error("empty response body for tab {gid}")]
    EmptyResponse { gid: String },

    #[error("failed to parse grid CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// HTTP client for one published spreadsheet document, with a time-boxed
/// per-tab grid cache.
pub struct SheetClient {
    document_id: String,
    client: reqwest::Client,
    cache_ttl: Duration,
    cache: HashMap<String, (Instant, RawGrid)>,
}

impl SheetClient {
    pub fn new(document_id: &str) -> Result<Self, SheetError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            document_id: document_id.to_string(),
            client,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: HashMap::new(),
        })
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    fn export_url(&self, gid: &str) -> String {
        format!(
            "{}/{}/export?format=csv&gid={}",
            EXPORT_BASE, self.document_id, gid
        )
    }

    /// Cached grid for a tab, if one exists and is younger than the TTL.
    fn cached(&self, gid: &str) -> Option<&RawGrid> {
        self.cache
            .get(gid)
            .filter(|(fetched_at, _)| fetched_at.elapsed() < self.cache_ttl)
            .map(|(_, grid)| grid)
    }

    /// Fetch the grid behind a tab, reusing a cached copy younger than the
    /// TTL. Everything past the TTL is fetched fresh.
    pub async fn fetch_grid(&mut self, gid: &str) -> Result<RawGrid, SheetError> {
        if let Some(grid) = self.cached(gid) {
            debug!("cache hit for tab {}", gid);
            return Ok(grid.clone());
        }

        let url = self.export_url(gid);
        info!("fetching grid: {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Status {
                gid: gid.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(SheetError::EmptyResponse {
                gid: gid.to_string(),
            });
        }

        let grid = RawGrid::parse_csv(&body)?;
        debug!("fetched {} rows for tab {}", grid.row_count(), gid);
        self.cache.insert(gid.to_string(), (Instant::now(), grid.clone()));
        Ok(grid)
    }
}

#[cfg(test)]
mod test {
    use super::SheetClient;
    use crate::grid::RawGrid;
    use std::time::{Duration, Instant};

    const BODY: &str = "Item,114.01\nThroughput,42\n";

    #[test]
    fn test_export_url() {
        let client = SheetClient::new("doc-123").unwrap();
        assert_eq!(
            client.export_url("1358452097"),
            "https://docs.google.com/spreadsheets/d/doc-123/export?format=csv&gid=1358452097"
        );
    }

    #[test]
    fn test_cache_serves_fresh_entry() {
        let mut client = SheetClient::new("doc-123").unwrap();
        let grid = RawGrid::parse_csv(BODY).unwrap();
        client
            .cache
            .insert("7".to_string(), (Instant::now(), grid.clone()));

        assert_eq!(client.cached("7"), Some(&grid));
        // Unknown tabs fall through to a fetch.
        assert_eq!(client.cached("8"), None);
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let mut client = SheetClient::new("doc-123")
            .unwrap()
            .with_cache_ttl(Duration::from_millis(10));
        let grid = RawGrid::parse_csv(BODY).unwrap();
        let stale = Instant::now() - Duration::from_secs(1);
        client.cache.insert("7".to_string(), (stale, grid));

        assert_eq!(client.cached("7"), None);
    }
}
