use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the orders dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from one of the input tables.
    #[error("Schema mismatch: table '{table}' has no column '{column}'")]
    SchemaMismatch { table: String, column: String },

    /// A purchase timestamp did not match any recognised format.
    #[error("Unparsable timestamp for order {order_id}: {value:?}")]
    UnparsableTimestamp { order_id: String, value: String },

    /// A month string was not of the form `YYYY-MM`.
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// The configured data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
