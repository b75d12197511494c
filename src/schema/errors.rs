//! Schema error types
//!
//! Error codes:
//! - TBLC_UNKNOWN_HEADER_CELL (REJECT)
//! - TBLC_UNSUPPORTED_TYPE (REJECT)
//! - TBLC_ILL_FORMED_ENUM (REJECT)
//! - TBLC_MISSING_TYPE_DEFINITION (REJECT)
//! - TBLC_HEADER_MISMATCH (REJECT)
//! - TBLC_TYPE_MISMATCH (REJECT)
//! - TBLC_DUPLICATE_FIELD (REJECT)
//!
//! A schema error rejects one sheet. Sibling sheets are still parsed and
//! all errors of a source are reported together.

use std::fmt;

/// Severity levels shared by schema and load errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The offending sheet is rejected, processing continues
    Reject,
    /// The current operation cannot continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Header cell that is neither a string nor blank
    UnknownHeaderCell,
    /// Type tag outside the supported set
    UnsupportedType,
    /// Enum type without a usable domain
    IllFormedEnum,
    /// Type row, or a type cell inside the header extent, is missing
    MissingTypeDefinition,
    /// Header differs from the canonical header
    HeaderMismatch,
    /// Type row differs from the canonical types
    TypeMismatch,
    /// Same column name twice in one header
    DuplicateField,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownHeaderCell => "TBLC_UNKNOWN_HEADER_CELL",
            SchemaErrorCode::UnsupportedType => "TBLC_UNSUPPORTED_TYPE",
            SchemaErrorCode::IllFormedEnum => "TBLC_ILL_FORMED_ENUM",
            SchemaErrorCode::MissingTypeDefinition => "TBLC_MISSING_TYPE_DEFINITION",
            SchemaErrorCode::HeaderMismatch => "TBLC_HEADER_MISMATCH",
            SchemaErrorCode::TypeMismatch => "TBLC_TYPE_MISMATCH",
            SchemaErrorCode::DuplicateField => "TBLC_DUPLICATE_FIELD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Zero-based cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    pub row: usize,
    pub column: usize,
}

impl CellLocation {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Spreadsheet users count from one
        write!(f, "row {}, column {}", self.row + 1, self.column + 1)
    }
}

/// Schema error with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    source_name: String,
    sheet_name: String,
    location: Option<CellLocation>,
}

impl SchemaError {
    fn new(
        code: SchemaErrorCode,
        source_name: &str,
        sheet_name: &str,
        location: Option<CellLocation>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: source_name.to_string(),
            sheet_name: sheet_name.to_string(),
            location,
        }
    }

    /// Create an unknown header cell error
    pub fn unknown_header_cell(
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        kind: impl fmt::Display,
    ) -> Self {
        Self::new(
            SchemaErrorCode::UnknownHeaderCell,
            source_name,
            sheet_name,
            Some(location),
            format!("Field name should be a string, found {} cell", kind),
        )
    }

    /// Create an unsupported type error
    pub fn unsupported_type(
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        type_name: &str,
    ) -> Self {
        Self::new(
            SchemaErrorCode::UnsupportedType,
            source_name,
            sheet_name,
            Some(location),
            format!("Type '{}' is unsupported", type_name),
        )
    }

    /// Create an ill-formed enum error
    pub fn ill_formed_enum(
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        reason: &str,
    ) -> Self {
        Self::new(
            SchemaErrorCode::IllFormedEnum,
            source_name,
            sheet_name,
            Some(location),
            format!("Ill-formed enum definition: {}", reason),
        )
    }

    /// Create a missing type definition error.
    ///
    /// `location` is `None` when the whole type row is absent.
    pub fn missing_type_definition(
        source_name: &str,
        sheet_name: &str,
        location: Option<CellLocation>,
    ) -> Self {
        let message = match location {
            Some(_) => "Missing type definition for column",
            None => "Missing type definitions",
        };
        Self::new(
            SchemaErrorCode::MissingTypeDefinition,
            source_name,
            sheet_name,
            location,
            message,
        )
    }

    /// Create a header mismatch error
    pub fn header_mismatch(source_name: &str, sheet_name: &str, expected: &[String], actual: &[String]) -> Self {
        Self::new(
            SchemaErrorCode::HeaderMismatch,
            source_name,
            sheet_name,
            None,
            format!(
                "Field names in different sheets should be identical: expected [{}], got [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
        )
    }

    /// Create a type mismatch error
    pub fn type_mismatch(source_name: &str, sheet_name: &str, expected: &[String], actual: &[String]) -> Self {
        Self::new(
            SchemaErrorCode::TypeMismatch,
            source_name,
            sheet_name,
            None,
            format!(
                "Type definitions in different sheets should be identical: expected [{}], got [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
        )
    }

    /// Create a duplicate field error
    pub fn duplicate_field(
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        field: &str,
    ) -> Self {
        Self::new(
            SchemaErrorCode::DuplicateField,
            source_name,
            sheet_name,
            Some(location),
            format!("Field '{}' is declared more than once", field),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source (file) name
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Returns the sheet name
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Returns the zero-based cell coordinates, when known
    pub fn location(&self) -> Option<CellLocation> {
        self.location
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}/{}",
            self.code.severity(),
            self.code.code(),
            self.source_name,
            self.sheet_name
        )?;
        if let Some(location) = self.location {
            write!(f, " ({})", location)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
