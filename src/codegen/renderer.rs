//! Target-language renderers
//!
//! A renderer knows how one target language spells a field, an enum and a
//! file. Everything language-independent (placeholders, quoting, order)
//! lives in the generator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnSchema, ColumnType};

use super::template::{
    CSHARP_CONTAINER_TEMPLATE, CSHARP_ENTITY_TEMPLATE, RUST_CONTAINER_TEMPLATE,
    RUST_ENTITY_TEMPLATE,
};

/// Target language of generated declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    CSharp,
    Rust,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::Rust => "rust",
        }
    }

    /// Returns the renderer for this language
    pub fn renderer(&self) -> Box<dyn DeclarationRenderer> {
        match self {
            Language::CSharp => Box::new(CSharpRenderer),
            Language::Rust => Box::new(RustRenderer),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csharp" | "cs" | "c#" => Ok(Language::CSharp),
            "rust" | "rs" => Ok(Language::Rust),
            other => Err(format!("Unknown language '{}'", other)),
        }
    }
}

/// Spells schema elements in one target language
pub trait DeclarationRenderer: Send + Sync {
    fn language(&self) -> Language;

    /// Extension of generated files, without the dot
    fn file_extension(&self) -> &'static str;

    fn entity_template(&self) -> &'static str;

    fn container_template(&self) -> &'static str;

    /// Name of the nested type generated for an enum column
    fn enum_type_name(&self, entity_name: &str, column: &ColumnSchema) -> String;

    /// One member declaration line
    fn field_line(&self, entity_name: &str, column: &ColumnSchema) -> String;

    /// A complete enum declaration, starting with a blank line
    fn enum_block(&self, entity_name: &str, column: &ColumnSchema, domain: &[String]) -> String;
}

/// C# classes with public fields and nested enums
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpRenderer;

impl DeclarationRenderer for CSharpRenderer {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn file_extension(&self) -> &'static str {
        "cs"
    }

    fn entity_template(&self) -> &'static str {
        CSHARP_ENTITY_TEMPLATE
    }

    fn container_template(&self) -> &'static str {
        CSHARP_CONTAINER_TEMPLATE
    }

    fn enum_type_name(&self, _entity_name: &str, column: &ColumnSchema) -> String {
        format!("enum_{}", column.name)
    }

    fn field_line(&self, entity_name: &str, column: &ColumnSchema) -> String {
        let type_name = match &column.column_type {
            ColumnType::Int => "int".to_string(),
            ColumnType::Bool => "bool".to_string(),
            ColumnType::Float => "float".to_string(),
            ColumnType::String => "string".to_string(),
            ColumnType::Enum { .. } => self.enum_type_name(entity_name, column),
        };
        format!("\tpublic {} {};", type_name, column.name)
    }

    fn enum_block(&self, entity_name: &str, column: &ColumnSchema, domain: &[String]) -> String {
        let values: Vec<String> = domain.iter().map(|v| format!("\t\t{}", v)).collect();
        format!(
            "\n\tpublic enum {}\n\t{{\n{}\n\t}}\n",
            self.enum_type_name(entity_name, column),
            values.join(",\n")
        )
    }
}

/// Rust structs with public fields and sibling enums
#[derive(Debug, Clone, Copy, Default)]
pub struct RustRenderer;

impl DeclarationRenderer for RustRenderer {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn entity_template(&self) -> &'static str {
        RUST_ENTITY_TEMPLATE
    }

    fn container_template(&self) -> &'static str {
        RUST_CONTAINER_TEMPLATE
    }

    // Rust has no nested types, so the enum is prefixed with its entity
    fn enum_type_name(&self, entity_name: &str, column: &ColumnSchema) -> String {
        format!("{}_{}", entity_name, column.name)
    }

    fn field_line(&self, entity_name: &str, column: &ColumnSchema) -> String {
        let type_name = match &column.column_type {
            ColumnType::Int => "i64".to_string(),
            ColumnType::Bool => "bool".to_string(),
            ColumnType::Float => "f64".to_string(),
            ColumnType::String => "String".to_string(),
            ColumnType::Enum { .. } => self.enum_type_name(entity_name, column),
        };
        format!("    pub {}: {},", column.name, type_name)
    }

    fn enum_block(&self, entity_name: &str, column: &ColumnSchema, domain: &[String]) -> String {
        let mut block = String::new();
        block.push_str("\n#[allow(non_camel_case_types)]\n");
        block.push_str("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]\n");
        block.push_str(&format!(
            "pub enum {} {{\n",
            self.enum_type_name(entity_name, column)
        ));
        for (i, value) in domain.iter().enumerate() {
            if i == 0 {
                block.push_str("    #[default]\n");
            }
            block.push_str(&format!("    {},\n", value));
        }
        block.push_str("}\n");
        block
    }
}
