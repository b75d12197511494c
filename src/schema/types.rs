//! Column and table schema definitions
//!
//! Supported column types:
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - string: UTF-8 string
//! - enum: one value out of an ordered, declared domain

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of primitive type tags accepted in a type row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Int,
    Bool,
    Float,
    String,
    Enum,
}

impl TypeTag {
    /// Every tag, in declaration order
    pub const ALL: [TypeTag; 5] = [
        TypeTag::Int,
        TypeTag::Bool,
        TypeTag::Float,
        TypeTag::String,
        TypeTag::Enum,
    ];

    /// Returns the tag as written in a type row
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::Enum => "enum",
        }
    }

    /// Looks up an already-normalized tag name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The declared type of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Bool,
    Float,
    String,
    /// Enum with its values in declared order (never sorted)
    Enum { domain: Vec<String> },
}

impl ColumnType {
    pub fn tag(&self) -> TypeTag {
        match self {
            ColumnType::Int => TypeTag::Int,
            ColumnType::Bool => TypeTag::Bool,
            ColumnType::Float => TypeTag::Float,
            ColumnType::String => TypeTag::String,
            ColumnType::Enum { .. } => TypeTag::Enum,
        }
    }

    /// Returns the enum domain, present only for enum columns
    pub fn enum_domain(&self) -> Option<&[String]> {
        match self {
            ColumnType::Enum { domain } => Some(domain),
            _ => None,
        }
    }

    /// Canonical text form: the bare tag, or `enum|v1,v2,...`.
    ///
    /// Parsing this text with `parse_type_cell` yields the same type.
    pub fn canonical(&self) -> String {
        match self {
            ColumnType::Enum { domain } => format!("enum|{}", domain.join(",")),
            other => other.tag().as_str().to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// One named, typed slot of a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Normalized name (trimmed, lowercase)
    pub name: String,
    #[serde(flatten)]
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.column_type.tag()
    }

    pub fn enum_domain(&self) -> Option<&[String]> {
        self.column_type.enum_domain()
    }
}

/// Ordered column schema of one logical entity.
///
/// Column order is the binding contract for code generation and row loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub entity_name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(entity_name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            entity_name: entity_name.into(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Canonical type strings in declaration order
    pub fn field_types(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column_type.canonical()).collect()
    }

    /// Returns the position of a column by normalized name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Validates the schema structure itself: unique names, non-empty enum domains
    pub fn validate_structure(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err("Column names must not be empty".into());
            }
            if !seen.insert(column.name.as_str()) {
                return Err(format!("Duplicate column '{}'", column.name));
            }
            if let Some(domain) = column.enum_domain() {
                if domain.is_empty() {
                    return Err(format!("Enum column '{}' has an empty domain", column.name));
                }
            }
        }
        Ok(())
    }
}
