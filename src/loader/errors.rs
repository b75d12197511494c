//! Row loading errors
//!
//! All load errors are FATAL for the load in progress: no partial record
//! list is returned. Coordinates are carried zero-based and printed
//! one-based.

use std::fmt;

use crate::schema::{CellLocation, Severity};

/// Load-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorCode {
    /// Cell kind incompatible with the column type, or a numeric value
    /// that does not fit
    Coercion,
    /// String not in the enum domain
    EnumDomain,
    /// No schema available for the entity
    SchemaUnavailable,
}

impl LoadErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            LoadErrorCode::Coercion => "TBLC_LOAD_COERCION",
            LoadErrorCode::EnumDomain => "TBLC_LOAD_ENUM_DOMAIN",
            LoadErrorCode::SchemaUnavailable => "TBLC_LOAD_SCHEMA_UNAVAILABLE",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for LoadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Load error with its position in the source
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    code: LoadErrorCode,
    message: String,
    source_name: String,
    sheet_name: Option<String>,
    location: Option<CellLocation>,
    column_name: Option<String>,
}

impl LoadError {
    fn at_cell(
        code: LoadErrorCode,
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        column_name: &str,
        message: String,
    ) -> Self {
        Self {
            code,
            message,
            source_name: source_name.to_string(),
            sheet_name: Some(sheet_name.to_string()),
            location: Some(location),
            column_name: Some(column_name.to_string()),
        }
    }

    /// Create a coercion error for one cell
    pub fn coercion(
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        column_name: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::at_cell(
            LoadErrorCode::Coercion,
            source_name,
            sheet_name,
            location,
            column_name,
            reason.into(),
        )
    }

    /// Create an enum domain error for one cell
    pub fn enum_domain(
        source_name: &str,
        sheet_name: &str,
        location: CellLocation,
        column_name: &str,
        value: &str,
        domain: &[String],
    ) -> Self {
        Self::at_cell(
            LoadErrorCode::EnumDomain,
            source_name,
            sheet_name,
            location,
            column_name,
            format!("'{}' is not one of [{}]", value, domain.join(", ")),
        )
    }

    /// Create a schema unavailable error
    pub fn schema_unavailable(source_name: &str, entity_name: &str) -> Self {
        Self {
            code: LoadErrorCode::SchemaUnavailable,
            message: format!("No compiled schema for entity {}", entity_name),
            source_name: source_name.to_string(),
            sheet_name: None,
            location: None,
            column_name: None,
        }
    }

    /// Create a schema unavailable error for a descriptor that no longer parses
    pub fn invalid_descriptor(source_name: &str, reason: impl Into<String>) -> Self {
        Self {
            code: LoadErrorCode::SchemaUnavailable,
            message: reason.into(),
            source_name: source_name.to_string(),
            sheet_name: None,
            location: None,
            column_name: None,
        }
    }

    pub fn code(&self) -> LoadErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    /// Zero-based cell coordinates, when the error is tied to a cell
    pub fn location(&self) -> Option<CellLocation> {
        self.location
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.source_name)?;
        if let Some(sheet) = &self.sheet_name {
            write!(f, "/{}", sheet)?;
        }
        if let Some(location) = self.location {
            write!(f, " ({})", location)?;
        }
        if let Some(column) = &self.column_name {
            write!(f, " field '{}'", column)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for LoadError {}

/// Result type for row loading
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_load_errors_are_fatal() {
        for code in [
            LoadErrorCode::Coercion,
            LoadErrorCode::EnumDomain,
            LoadErrorCode::SchemaUnavailable,
        ] {
            assert_eq!(code.severity(), Severity::Fatal);
            assert!(code.code().starts_with("TBLC_LOAD_"));
        }
    }

    #[test]
    fn test_display_is_one_based() {
        let err = LoadError::coercion(
            "Test.json",
            "Sheet1",
            CellLocation::new(2, 0),
            "id",
            "expected numeric, found string",
        );
        assert_eq!(
            err.to_string(),
            "[FATAL] TBLC_LOAD_COERCION: Test.json/Sheet1 (row 3, column 1) field 'id': expected numeric, found string"
        );
    }

    #[test]
    fn test_enum_domain_message() {
        let err = LoadError::enum_domain(
            "Test.json",
            "Sheet1",
            CellLocation::new(4, 2),
            "color",
            "purple",
            &["red".into(), "green".into()],
        );
        assert_eq!(err.code(), LoadErrorCode::EnumDomain);
        assert!(err.message().contains("purple"));
        assert_eq!(err.column_name(), Some("color"));
    }

    #[test]
    fn test_schema_unavailable_has_no_cell() {
        let err = LoadError::schema_unavailable("Test.json", "Entity_Test");
        assert!(err.location().is_none());
        assert!(err.sheet_name().is_none());
        assert!(err.to_string().contains("Entity_Test"));
    }
}
