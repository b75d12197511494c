//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::codegen::CodegenError;
use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::loader::LoadError;
use crate::workbook::WorkbookError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, files)
    IoError,
    /// Source workbook could not be opened
    SourceError,
    /// At least one sheet schema was rejected
    SchemaRejected,
    /// Records could not be loaded
    LoadFailed,
    /// Declaration could not be generated
    CodegenFailed,
    /// One or more sources failed to import
    ImportFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TBLC_CLI_CONFIG_ERROR",
            Self::IoError => "TBLC_CLI_IO_ERROR",
            Self::SourceError => "TBLC_CLI_SOURCE_ERROR",
            Self::SchemaRejected => "TBLC_CLI_SCHEMA_REJECTED",
            Self::LoadFailed => "TBLC_CLI_LOAD_FAILED",
            Self::CodegenFailed => "TBLC_CLI_CODEGEN_FAILED",
            Self::ImportFailed => "TBLC_CLI_IMPORT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SourceError, msg)
    }

    pub fn schema_rejected(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SchemaRejected, msg)
    }

    pub fn load_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::LoadFailed, msg)
    }

    pub fn codegen_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::CodegenFailed, msg)
    }

    pub fn import_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ImportFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<WorkbookError> for CliError {
    fn from(e: WorkbookError) -> Self {
        Self::source_error(e.to_string())
    }
}

impl From<CodegenError> for CliError {
    fn from(e: CodegenError) -> Self {
        Self::codegen_failed(format!("{}: {}", e.code(), e))
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        Self::load_failed(e.to_string())
    }
}

impl From<ImportError> for CliError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::Config(e) => e.into(),
            ImportError::Codegen(e) => e.into(),
            other => Self::import_failed(format!("{}: {}", other.code(), other)),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
