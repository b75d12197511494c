use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codegen::CodegenError;

/// Result type for compile orchestration
pub type CompileResult<T> = Result<T, CompileError>;

/// Failures outside schema parsing. Schema errors are collected in the
/// compile report instead.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Failed to read descriptors from '{}': {source}", .path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Codegen(e) => e.code(),
            CompileError::Registry { .. } => "TBLC_REGISTRY_IO",
        }
    }
}
