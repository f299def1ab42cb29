//! FILENAME: app/orchestrator/src/error.rs

use thiserror::Error;

/// Failure reported by the query boundary. Never reaches the renderer: the
/// controller turns it into a `nodata` result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("dataset '{0}' is not available")]
    MissingDataset(String),

    #[error("fetch timed out after {0}ms")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid dashboard config: {0}")]
    Parse(#[from] serde_json::Error),
}
