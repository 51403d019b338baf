//! Error types for streamgraph-core (WASM-compatible)

use thiserror::Error;

/// Result type alias for streamgraph-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that work in both native and WASM environments
///
/// Malformed CSV content never produces one of these: bad fields degrade to
/// NaN values or missing dates. Errors are reserved for I/O, config and
/// serialization failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
