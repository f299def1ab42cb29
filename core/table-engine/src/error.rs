//! FILENAME: core/table-engine/src/error.rs

use engine::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("unknown column key '{0}'")]
    UnknownColumn(String),

    #[error("row hierarchy is broken: {0}")]
    Hierarchy(#[from] ModelError),
}
