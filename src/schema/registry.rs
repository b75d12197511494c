//! Type registry: the closed set of type tags and the type-cell syntax
//!
//! A type cell is a tag optionally followed by `|` and a comma separated
//! enum domain, e.g. `int`, `string`, `enum|red,green,blue`. Whitespace is
//! insignificant and tags are case-insensitive.

use std::collections::HashSet;
use std::fmt;

use super::types::{ColumnType, TypeTag};

/// Reasons a type cell cannot be turned into a column type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCellError {
    /// The tag is not one of the supported tags
    Unsupported(String),
    /// An enum tag without a usable domain
    IllFormedEnum(String),
}

impl fmt::Display for TypeCellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCellError::Unsupported(tag) => write!(f, "type '{}' is unsupported", tag),
            TypeCellError::IllFormedEnum(reason) => write!(f, "ill-formed enum: {}", reason),
        }
    }
}

/// Returns whether `tag` names a supported type.
pub fn has_type(tag: &str) -> bool {
    TypeTag::from_name(tag).is_some()
}

/// Parses one type cell into a column type.
///
/// The enum domain keeps the declared order.
pub fn parse_type_cell(raw: &str) -> Result<ColumnType, TypeCellError> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let mut segments = normalized.split('|');
    let tag_name = segments.next().unwrap_or_default();
    let tag = TypeTag::from_name(tag_name)
        .ok_or_else(|| TypeCellError::Unsupported(tag_name.to_string()))?;

    let domain_segment = segments.next();
    if segments.next().is_some() {
        return Err(match tag {
            TypeTag::Enum => TypeCellError::IllFormedEnum("more than one '|' separator".into()),
            _ => TypeCellError::Unsupported(normalized),
        });
    }

    match tag {
        TypeTag::Enum => {
            let domain = domain_segment
                .ok_or_else(|| TypeCellError::IllFormedEnum("missing value list".into()))?;
            parse_enum_domain(domain).map(|domain| ColumnType::Enum { domain })
        }
        _ if domain_segment.is_some() => Err(TypeCellError::Unsupported(normalized)),
        TypeTag::Int => Ok(ColumnType::Int),
        TypeTag::Bool => Ok(ColumnType::Bool),
        TypeTag::Float => Ok(ColumnType::Float),
        TypeTag::String => Ok(ColumnType::String),
    }
}

fn parse_enum_domain(domain: &str) -> Result<Vec<String>, TypeCellError> {
    if domain.is_empty() {
        return Err(TypeCellError::IllFormedEnum("empty value list".into()));
    }

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for value in domain.split(',') {
        if value.is_empty() {
            return Err(TypeCellError::IllFormedEnum("empty value in list".into()));
        }
        if !seen.insert(value) {
            return Err(TypeCellError::IllFormedEnum(format!("repeated value '{}'", value)));
        }
        values.push(value.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_type() {
        for tag in ["int", "bool", "float", "string", "enum"] {
            assert!(has_type(tag));
        }
        assert!(!has_type("INT"));
        assert!(!has_type("date"));
    }

    #[test]
    fn test_primitive_tags_normalized() {
        assert_eq!(parse_type_cell(" Int "), Ok(ColumnType::Int));
        assert_eq!(parse_type_cell("STRING"), Ok(ColumnType::String));
        assert_eq!(parse_type_cell("b o o l"), Ok(ColumnType::Bool));
    }

    #[test]
    fn test_enum_domain_keeps_order() {
        let parsed = parse_type_cell("ENUM | Red , Green , Blue").unwrap();
        assert_eq!(
            parsed.enum_domain().unwrap(),
            &["red".to_string(), "green".to_string(), "blue".to_string()]
        );
    }

    #[test]
    fn test_unsupported_tag() {
        assert_eq!(
            parse_type_cell("double"),
            Err(TypeCellError::Unsupported("double".into()))
        );
        assert!(matches!(parse_type_cell("int|1,2"), Err(TypeCellError::Unsupported(_))));
    }

    #[test]
    fn test_ill_formed_enums() {
        for raw in ["enum", "enum|", "enum|a,,b", "enum|a,a", "enum|a|b"] {
            assert!(
                matches!(parse_type_cell(raw), Err(TypeCellError::IllFormedEnum(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        let parsed = parse_type_cell("enum|north,south").unwrap();
        assert_eq!(parse_type_cell(&parsed.canonical()), Ok(parsed));
    }
}
