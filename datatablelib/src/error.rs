//! Error types for datatablelib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur outside the pure pipeline stages.
///
/// Filtering, sorting and paging never fail; these variants cover the
/// collaborators around them (snapshot storage, spreadsheet output,
/// column selection by name or pattern).
#[derive(Error, Debug)]
pub enum DataTableError {
    /// Failed to read or write a visibility snapshot
    #[error("failed to access snapshot '{path}': {source}")]
    Snapshot {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No platform data directory for the default snapshot store
    #[error("could not determine a data directory for column snapshots")]
    NoDataDir,

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Column key not present in the table schema
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet writer error
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Template rendering error
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
