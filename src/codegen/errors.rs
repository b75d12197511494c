//! Code generation errors
//!
//! All of these are configuration problems: they are fatal for the
//! generation step and reported once.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for code generation
pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("Output directory not found: {}", .0.display())]
    MissingOutputDirectory(PathBuf),

    #[error("'{value}' in {context} is not a valid identifier")]
    InvalidIdentifier { context: String, value: String },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CodegenError::MissingTemplate(_) => "TBLC_MISSING_TEMPLATE",
            CodegenError::MissingOutputDirectory(_) => "TBLC_MISSING_OUTPUT_DIRECTORY",
            CodegenError::InvalidIdentifier { .. } => "TBLC_INVALID_IDENTIFIER",
            CodegenError::Io { .. } => "TBLC_CODEGEN_IO",
        }
    }
}
