//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Measure pill '{0}' has no aggregation")]
    MissingAggregation(String),

    #[error("Filter on '{0}' has no values")]
    EmptyFilterValues(String),

    #[error("Pill '{0}' on the filters shelf carries no filter")]
    MissingFilter(String),

    #[error("Row path '{path}' has no parent row '{parent}'")]
    OrphanPath { path: String, parent: String },
}
