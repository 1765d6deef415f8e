//! Centralized error handling.

use thiserror::Error;

/// Errors raised while retrieving, decoding, or resampling gridded data.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested variable/resolution/period/version combination does not
    /// exist in the catalogue. Never retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The catalogue was unreachable or answered with a server-side failure.
    /// Propagation is the caller's responsibility; this crate does not retry.
    #[error("catalogue unreachable: {0}")]
    TransientNetwork(String),

    /// A retrieved archive could not be decoded into grid readings.
    #[error("malformed archive payload: {0}")]
    Archive(String),

    /// A cube could not be assembled or has inconsistent axes.
    #[error("malformed grid: {0}")]
    Grid(String),

    /// A malformed or dimensionless cube was passed to the aggregator.
    #[error("aggregation failed: {0}")]
    Aggregation(String),

    /// The retrieved dataset does not contain a requested variable.
    #[error("variable `{variable}` not present in retrieved dataset")]
    VariableNotFound { variable: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Result type alias for catalogue and resampling operations.
pub type Result<T> = std::result::Result<T, Error>;
