use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codegen::CodegenError;
use crate::compiler::CompileError;
use crate::config::ConfigError;

/// Result type for importer hooks
pub type ImportResult<T> = Result<T, ImportError>;

/// Failures that stop a whole import run.
///
/// Problems confined to one source (unreadable file, rejected schema,
/// failed load) are reported in that source's outcome instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to remove '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Config(_) => "TBLC_CONFIG_ERROR",
            ImportError::Codegen(e) => e.code(),
            ImportError::Compile(e) => e.code(),
            ImportError::Serialize(_) => "TBLC_SERIALIZE_ERROR",
            ImportError::Remove { .. } => "TBLC_REMOVE_FAILED",
        }
    }
}
