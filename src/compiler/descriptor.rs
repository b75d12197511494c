//! Compiled descriptors and their registry
//!
//! A descriptor is the persisted summary of a generated declaration: the
//! entity name plus field names and canonical type strings in column order.
//! It is how the importer decides whether a source needs recompiling, and
//! how rows are loaded when no fresh schema is at hand.
//!
//! The registry is a cache keyed by entity name. It only grows between
//! reloads; a reload flushes it and rebuilds it from the declarations on
//! disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::extract_descriptor;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{parse_type_cell, CanonicalSchema, ColumnSchema, TableSchema};

use super::errors::{CompileError, CompileResult};

/// Field names and canonical type strings of one generated entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledDescriptor {
    pub entity_name: String,
    pub field_names: Vec<String>,
    pub field_types: Vec<String>,
}

impl CompiledDescriptor {
    pub fn new(
        entity_name: impl Into<String>,
        field_names: Vec<String>,
        field_types: Vec<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            field_names,
            field_types,
        }
    }

    pub fn from_schema(schema: &TableSchema) -> Self {
        Self::new(
            schema.entity_name.clone(),
            schema.field_names(),
            schema.field_types(),
        )
    }

    /// Rebuilds the table schema by parsing each type string
    pub fn to_schema(&self) -> Result<TableSchema, String> {
        if self.field_names.len() != self.field_types.len() {
            return Err(format!(
                "Descriptor for {} has {} names but {} types",
                self.entity_name,
                self.field_names.len(),
                self.field_types.len()
            ));
        }

        let mut columns = Vec::with_capacity(self.field_names.len());
        for (name, raw_type) in self.field_names.iter().zip(&self.field_types) {
            let column_type = parse_type_cell(raw_type)
                .map_err(|e| format!("Descriptor field '{}': {}", name, e))?;
            columns.push(ColumnSchema::new(name.clone(), column_type));
        }

        let schema = TableSchema::new(self.entity_name.clone(), columns);
        schema.validate_structure()?;
        Ok(schema)
    }

    /// Whether a freshly parsed canonical schema equals this descriptor,
    /// comparing names and type strings position by position
    pub fn matches(&self, canonical: &CanonicalSchema) -> bool {
        let (Some(names), Some(types)) = (canonical.field_names(), canonical.field_types()) else {
            return false;
        };
        names == self.field_names.as_slice()
            && types.len() == self.field_types.len()
            && types
                .iter()
                .zip(&self.field_types)
                .all(|(ty, expected)| ty.canonical() == *expected)
    }
}

/// Descriptors by entity name
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<String, CompiledDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_name: &str) -> Option<&CompiledDescriptor> {
        self.descriptors.get(entity_name)
    }

    /// Stores a descriptor, replacing any previous one for the same entity
    pub fn put(&mut self, descriptor: CompiledDescriptor) {
        self.descriptors
            .insert(descriptor.entity_name.clone(), descriptor);
    }

    pub fn contains(&self, entity_name: &str) -> bool {
        self.descriptors.contains_key(entity_name)
    }

    /// Drops every descriptor
    pub fn flush_all(&mut self) {
        let flushed = self.descriptors.len().to_string();
        self.descriptors.clear();
        log_event_with_fields(Event::RegistryFlushed, &[("flushed", &flushed)]);
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Entity names in sorted order
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Adds the descriptor of every generated declaration in `dir`.
    ///
    /// Files without descriptor markers are ignored. Returns the number of
    /// descriptors added.
    pub fn load_dir(&mut self, dir: &Path) -> CompileResult<usize> {
        let io_error = |source| CompileError::Registry {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        // Deterministic order when two files declare the same entity
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            // Declarations are text; anything else is not ours
            let Ok(text) = fs::read_to_string(&path) else {
                continue;
            };
            if let Some(descriptor) = extract_descriptor(&text) {
                self.put(descriptor);
                loaded += 1;
            }
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{CodeGenerator, Language};
    use crate::schema::ColumnType;
    use tempfile::TempDir;

    fn test_schema() -> TableSchema {
        TableSchema::new(
            "Entity_Test",
            vec![
                ColumnSchema::new("id", ColumnType::Int),
                ColumnSchema::new(
                    "color",
                    ColumnType::Enum {
                        domain: vec!["red".into(), "green".into()],
                    },
                ),
            ],
        )
    }

    #[test]
    fn test_descriptor_from_schema() {
        let descriptor = CompiledDescriptor::from_schema(&test_schema());
        assert_eq!(descriptor.entity_name, "Entity_Test");
        assert_eq!(descriptor.field_names, vec!["id", "color"]);
        assert_eq!(descriptor.field_types, vec!["int", "enum|red,green"]);
        assert_eq!(descriptor.to_schema().unwrap(), test_schema());
    }

    #[test]
    fn test_descriptor_with_bad_type() {
        let descriptor =
            CompiledDescriptor::new("Entity_Test", vec!["id".into()], vec!["integer".into()]);
        assert!(descriptor.to_schema().is_err());
    }

    #[test]
    fn test_registry_put_replaces() {
        let mut registry = DescriptorRegistry::new();
        registry.put(CompiledDescriptor::new("E", vec!["a".into()], vec!["int".into()]));
        registry.put(CompiledDescriptor::new("E", vec!["b".into()], vec!["bool".into()]));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("E").unwrap().field_names, vec!["b"]);
    }

    #[test]
    fn test_flush_all() {
        let mut registry = DescriptorRegistry::new();
        registry.put(CompiledDescriptor::from_schema(&test_schema()));
        registry.flush_all();
        assert!(registry.is_empty());
        assert!(registry.get("Entity_Test").is_none());
    }

    #[test]
    fn test_load_dir_reads_generated_declarations() {
        let dir = TempDir::new().unwrap();
        let text = CodeGenerator::new(Language::CSharp)
            .render(&test_schema(), "Entity_Test")
            .unwrap();
        fs::write(dir.path().join("Entity_Test.cs"), text).unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing to see").unwrap();

        let mut registry = DescriptorRegistry::new();
        let loaded = registry.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(
            registry.get("Entity_Test").unwrap(),
            &CompiledDescriptor::from_schema(&test_schema())
        );
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let dir = TempDir::new().unwrap();
        let mut registry = DescriptorRegistry::new();
        let result = registry.load_dir(&dir.path().join("absent"));
        assert!(matches!(result, Err(CompileError::Registry { .. })));
    }
}
