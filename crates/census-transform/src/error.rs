//! Error types for census transformations.

use thiserror::Error;

/// Errors raised while reshaping census tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the stage depends on is absent.
    #[error("column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    /// A lookup referenced by the join plan was never prepared.
    #[error("lookup '{0}' is not available")]
    MissingLookup(String),

    /// A lookup table has no columns at all.
    #[error("lookup '{0}' has no columns")]
    EmptyLookup(String),

    /// A join changed the number of fact rows.
    #[error("join on '{step}' changed row count from {before} to {after}")]
    CardinalityChanged {
        step: String,
        before: usize,
        after: usize,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
