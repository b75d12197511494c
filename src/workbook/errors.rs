//! Container reading errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for container reads
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Errors raised while opening or decoding a workbook container
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed container '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("No reader registered for extension '{0}'")]
    UnsupportedFormat(String),
}
