//! Declaration templates
//!
//! A template is plain text with `#SYMBOL#` placeholders. Substitution is a
//! single left-to-right pass, so substituted text is never rescanned.
//!
//! Entity templates carry three marker lines (`tablec:entity`,
//! `tablec:fieldnames`, `tablec:fieldtypes`) from which the compiled
//! descriptor is read back when the registry is rebuilt.

use std::fs;
use std::path::Path;

use crate::compiler::CompiledDescriptor;

use super::errors::{CodegenError, CodegenResult};

pub const ENTITY_NAME: &str = "#ENTITYNAME#";
pub const FIELD_NAMES: &str = "#FIELDNAMES#";
pub const FIELD_TYPES: &str = "#FIELDTYPES#";
pub const FIELDS: &str = "#FIELDS#";
pub const ENUM_DEF: &str = "#ENUMDEF#";
pub const CONTAINER_NAME: &str = "#CONTAINERNAME#";
pub const SOURCE_PATH: &str = "#SOURCEPATH#";

pub const MARKER_ENTITY: &str = "tablec:entity";
pub const MARKER_FIELD_NAMES: &str = "tablec:fieldnames";
pub const MARKER_FIELD_TYPES: &str = "tablec:fieldtypes";

pub const CSHARP_ENTITY_TEMPLATE: &str = "\
// ======================================================
//      Auto-generated by tablec. Do not modify.
// ======================================================
// tablec:entity #ENTITYNAME#
// tablec:fieldnames #FIELDNAMES#
// tablec:fieldtypes #FIELDTYPES#
using System;
using System.Collections.Generic;

[Serializable]
[TableEntity(FieldNames = new string[] { #FIELDNAMES# }, FieldTypes = new string[] { #FIELDTYPES# })]
public class #ENTITYNAME#
{
#FIELDS#
#ENUMDEF#}
";

pub const CSHARP_CONTAINER_TEMPLATE: &str = "\
// ======================================================
//      Auto-generated by tablec. Do not modify.
// ======================================================
using System;
using System.Collections.Generic;

[TableContainer(SourcePath = \"#SOURCEPATH#\")]
public class #CONTAINERNAME#
{
\tpublic List<#ENTITYNAME#> Entities = new List<#ENTITYNAME#>();

\tpublic #ENTITYNAME# this[int index]
\t{
\t\tget { return index >= 0 && index < Entities.Count ? Entities[index] : null; }
\t}

\tpublic int Count
\t{
\t\tget { return Entities.Count; }
\t}
}
";

pub const RUST_ENTITY_TEMPLATE: &str = "\
// Auto-generated by tablec. Do not modify.
// tablec:entity #ENTITYNAME#
// tablec:fieldnames #FIELDNAMES#
// tablec:fieldtypes #FIELDTYPES#

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct #ENTITYNAME# {
#FIELDS#
}
#ENUMDEF#";

pub const RUST_CONTAINER_TEMPLATE: &str = "\
// Auto-generated by tablec. Do not modify.

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default)]
pub struct #CONTAINERNAME# {
    pub entities: Vec<#ENTITYNAME#>,
}

impl #CONTAINERNAME# {
    pub const SOURCE_PATH: &'static str = \"#SOURCEPATH#\";

    pub fn get(&self, index: usize) -> Option<&#ENTITYNAME#> {
        self.entities.get(index)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
";

/// A declaration template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads a template file
    pub fn load(path: &Path) -> CodegenResult<Self> {
        if !path.is_file() {
            return Err(CodegenError::MissingTemplate(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces every occurrence of each placeholder with its value.
    ///
    /// Unknown `#...#` sequences are left as they are.
    pub fn fill(&self, substitutions: &[(&str, &str)]) -> String {
        let text = self.text.as_str();
        let mut output = String::with_capacity(text.len() * 2);
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some(offset) = rest.find('#') else {
                output.push_str(rest);
                break;
            };
            output.push_str(&rest[..offset]);
            pos += offset;

            let at = &text[pos..];
            match substitutions.iter().find(|(key, _)| at.starts_with(key)) {
                Some((key, value)) => {
                    output.push_str(value);
                    pos += key.len();
                }
                None => {
                    output.push('#');
                    pos += 1;
                }
            }
        }

        output
    }
}

/// Renders a list as comma-separated double-quoted strings: `"a", "b"`
pub fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inverse of `quote_list`. Returns None on anything that is not a
/// comma-separated list of quoted strings.
pub fn unquote_list(text: &str) -> Option<Vec<String>> {
    let mut items = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let body = rest.strip_prefix('"')?;
        let end = body.find('"')?;
        items.push(body[..end].to_string());

        rest = body[end + 1..].trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
            if rest.is_empty() {
                return None;
            }
        } else if !rest.is_empty() {
            return None;
        }
    }

    Some(items)
}

/// Finds the value following `marker` on the first line that contains it
pub fn marker_value<'t>(text: &'t str, marker: &str) -> Option<&'t str> {
    text.lines().find_map(|line| {
        let start = line.find(marker)? + marker.len();
        let value = &line[start..];
        // Markers are whole words
        if !value.is_empty() && !value.starts_with(char::is_whitespace) {
            return None;
        }
        Some(value.trim())
    })
}

/// Reads the compiled descriptor back out of a generated entity declaration.
///
/// Returns None when the marker lines are missing or malformed.
pub fn extract_descriptor(text: &str) -> Option<CompiledDescriptor> {
    let entity_name = marker_value(text, MARKER_ENTITY)?;
    let field_names = unquote_list(marker_value(text, MARKER_FIELD_NAMES)?)?;
    let field_types = unquote_list(marker_value(text, MARKER_FIELD_TYPES)?)?;

    if entity_name.is_empty() || field_names.len() != field_types.len() {
        return None;
    }
    Some(CompiledDescriptor::new(entity_name, field_names, field_types))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_all_occurrences() {
        let template = Template::new("class #ENTITYNAME# { #ENTITYNAME# x; }");
        let out = template.fill(&[(ENTITY_NAME, "Entity_Test")]);
        assert_eq!(out, "class Entity_Test { Entity_Test x; }");
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let template = Template::new("#FIELDS#|#ENTITYNAME#");
        let out = template.fill(&[(FIELDS, "#ENTITYNAME#"), (ENTITY_NAME, "E")]);
        assert_eq!(out, "#ENTITYNAME#|E");
    }

    #[test]
    fn test_fill_keeps_unknown_symbols() {
        let template = Template::new("# comment #UNKNOWN# #ENTITYNAME#");
        let out = template.fill(&[(ENTITY_NAME, "E")]);
        assert_eq!(out, "# comment #UNKNOWN# E");
    }

    #[test]
    fn test_quote_list_inverse() {
        let items = vec!["id".to_string(), "enum|red,green".to_string()];
        let quoted = quote_list(&items);
        assert_eq!(quoted, "\"id\", \"enum|red,green\"");
        assert_eq!(unquote_list(&quoted).unwrap(), items);
    }

    #[test]
    fn test_unquote_rejects_garbage() {
        assert_eq!(unquote_list(""), Some(vec![]));
        assert!(unquote_list("id, name").is_none());
        assert!(unquote_list("\"id\",").is_none());
        assert!(unquote_list("\"id\" \"name\"").is_none());
        assert!(unquote_list("\"unterminated").is_none());
    }

    #[test]
    fn test_marker_value() {
        let text = "// tablec:entity Entity_Test\n// tablec:entityx nope\n";
        assert_eq!(marker_value(text, MARKER_ENTITY), Some("Entity_Test"));
        assert_eq!(marker_value("nothing here", MARKER_ENTITY), None);
    }

    #[test]
    fn test_extract_descriptor() {
        let text = "// tablec:entity Entity_Test\n\
                    // tablec:fieldnames \"id\", \"color\"\n\
                    // tablec:fieldtypes \"int\", \"enum|red,green\"\n\
                    public class Entity_Test {}\n";
        let descriptor = extract_descriptor(text).unwrap();
        assert_eq!(descriptor.entity_name, "Entity_Test");
        assert_eq!(descriptor.field_names, vec!["id", "color"]);
        assert_eq!(descriptor.field_types, vec!["int", "enum|red,green"]);
    }

    #[test]
    fn test_extract_descriptor_requires_all_markers() {
        let text = "// tablec:entity Entity_Test\n// tablec:fieldnames \"id\"\n";
        assert!(extract_descriptor(text).is_none());

        let uneven = "// tablec:entity E\n// tablec:fieldnames \"id\"\n// tablec:fieldtypes \n";
        assert!(extract_descriptor(uneven).is_none());
    }

    #[test]
    fn test_load_missing_template() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = Template::load(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(CodegenError::MissingTemplate(_))));
    }

    #[test]
    fn test_load_template_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("entity.txt");
        fs::write(&path, "struct #ENTITYNAME#;").unwrap();

        let template = Template::load(&path).unwrap();
        assert_eq!(template.fill(&[(ENTITY_NAME, "E")]), "struct E;");
    }
}
