//! Compilation orchestrator
//!
//! Runs the schema parser over every sheet of a workbook against one shared
//! canonical schema. A rejected sheet never stops its siblings from being
//! parsed; compilation succeeds only if every sheet does. The generator is
//! invoked at most once, after all sheets, and only on success.

use serde::Serialize;

use crate::codegen::CodeGenerator;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{CanonicalSchema, SchemaError, SheetParser, TableSchema};
use crate::workbook::Workbook;

use super::descriptor::{CompiledDescriptor, DescriptorRegistry};
use super::errors::CompileResult;

/// Outcome of compiling the schema of one source
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub source_name: String,
    pub entity_name: String,
    pub success: bool,
    /// The compiled schema; None on failure or when every sheet is empty
    pub schema: Option<TableSchema>,
    /// One entry per rejected sheet, in sheet order
    pub errors: Vec<SchemaError>,
    pub sheets_parsed: usize,
}

impl CompileReport {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Serializable summary of the report
    pub fn summary(&self) -> CompileSummary {
        CompileSummary {
            source: self.source_name.clone(),
            entity: self.entity_name.clone(),
            success: self.success,
            sheets: self.sheets_parsed,
            field_names: self
                .schema
                .as_ref()
                .map(TableSchema::field_names)
                .unwrap_or_default(),
            field_types: self
                .schema
                .as_ref()
                .map(TableSchema::field_types)
                .unwrap_or_default(),
            errors: self.error_messages(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompileSummary {
    pub source: String,
    pub entity: String,
    pub success: bool,
    pub sheets: usize,
    pub field_names: Vec<String>,
    pub field_types: Vec<String>,
    pub errors: Vec<String>,
}

/// Result of `compile_with`: the report plus the rendered declaration
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub report: CompileReport,
    pub declaration: Option<String>,
}

/// Compiles the schema of one workbook
pub struct TableCompiler<'a> {
    source_name: String,
    entity_name: String,
    workbook: &'a Workbook,
}

impl<'a> TableCompiler<'a> {
    pub fn new(
        source_name: impl Into<String>,
        entity_name: impl Into<String>,
        workbook: &'a Workbook,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            entity_name: entity_name.into(),
            workbook,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Whether the declaration must be regenerated.
    ///
    /// Parses only the first sheet into a scratch canonical schema and
    /// compares it with the existing descriptor. No descriptor, a parse
    /// failure, or an empty first sheet all mean yes.
    pub fn need_compile(&self, existing: Option<&CompiledDescriptor>) -> bool {
        let Some(descriptor) = existing else {
            return true;
        };
        let Some(first) = self.workbook.first_sheet() else {
            return true;
        };

        let mut scratch = CanonicalSchema::new();
        if SheetParser::new(&self.source_name, first, &mut scratch)
            .parse()
            .is_err()
        {
            return true;
        }
        !descriptor.matches(&scratch)
    }

    /// Parses every sheet and reports the aggregate result.
    ///
    /// Each call starts from a fresh canonical schema, so repeated calls
    /// on the same workbook yield the same report.
    pub fn compile(&self) -> CompileReport {
        let source_count = self.workbook.sheet_count().to_string();
        log_event_with_fields(
            Event::CompileStart,
            &[("source", &self.source_name), ("sheets", &source_count)],
        );

        let mut canonical = CanonicalSchema::new();
        let mut errors = Vec::new();

        for sheet in self.workbook.sheets() {
            let result = SheetParser::new(&self.source_name, sheet, &mut canonical).parse();
            if let Err(error) = result {
                log_event_with_fields(
                    Event::SheetRejected,
                    &[
                        ("code", error.code().code()),
                        ("message", &error.to_string()),
                        ("sheet", sheet.name()),
                        ("source", &self.source_name),
                    ],
                );
                errors.push(error);
            }
        }

        let success = errors.is_empty();
        let schema = if success {
            canonical.to_table_schema(&self.entity_name)
        } else {
            None
        };

        CompileReport {
            source_name: self.source_name.clone(),
            entity_name: self.entity_name.clone(),
            success,
            schema,
            errors,
            sheets_parsed: self.workbook.sheet_count(),
        }
    }

    /// Compiles, and on success renders the declaration exactly once and
    /// records its descriptor in `registry`.
    ///
    /// Schema errors are reported in the outcome, not returned as `Err`;
    /// `Err` is reserved for generation failures.
    pub fn compile_with(
        &self,
        generator: &CodeGenerator,
        registry: &mut DescriptorRegistry,
    ) -> CompileResult<CompileOutcome> {
        let report = self.compile();

        if !report.success {
            let rejected = report.errors.len().to_string();
            log_event_with_fields(
                Event::CompileFailed,
                &[("rejected_sheets", &rejected), ("source", &self.source_name)],
            );
            return Ok(CompileOutcome {
                report,
                declaration: None,
            });
        }

        let Some(schema) = &report.schema else {
            // Every sheet was empty: nothing to declare
            return Ok(CompileOutcome {
                report,
                declaration: None,
            });
        };

        let declaration = generator.render(schema, &self.entity_name)?;
        registry.put(CompiledDescriptor::from_schema(schema));

        let columns = schema.len().to_string();
        log_event_with_fields(
            Event::CompileComplete,
            &[
                ("columns", &columns),
                ("entity", &self.entity_name),
                ("source", &self.source_name),
            ],
        );

        Ok(CompileOutcome {
            report,
            declaration: Some(declaration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Language;
    use crate::schema::{ColumnType, SchemaErrorCode};
    use crate::workbook::{Cell, Row, Sheet};

    fn sheet(name: &str, header: &[&str], types: &[&str]) -> Sheet {
        Sheet::from_rows(
            name,
            vec![
                header.iter().map(|h| Cell::from(*h)).collect(),
                types.iter().map(|t| Cell::from(*t)).collect(),
                Row::new(vec![Cell::from(1.0), Cell::from("sword")]),
            ],
        )
    }

    fn good_sheet(name: &str) -> Sheet {
        sheet(name, &["id", "name"], &["int", "string"])
    }

    #[test]
    fn test_compile_single_sheet() {
        let workbook = Workbook::new(vec![good_sheet("Sheet1")]);
        let report = TableCompiler::new("Test.json", "Entity_Test", &workbook).compile();

        assert!(report.success);
        let schema = report.schema.unwrap();
        assert_eq!(schema.entity_name, "Entity_Test");
        assert_eq!(schema.field_names(), vec!["id", "name"]);
        assert_eq!(schema.columns[0].column_type, ColumnType::Int);
    }

    #[test]
    fn test_compile_continues_after_rejected_sheet() {
        let workbook = Workbook::new(vec![
            good_sheet("Sheet1"),
            sheet("Sheet2", &["id", "title"], &["int", "string"]),
            sheet("Sheet3", &["id", "name"], &["int", "bool"]),
        ]);
        let report = TableCompiler::new("Test.json", "Entity_Test", &workbook).compile();

        assert!(!report.success);
        assert!(report.schema.is_none());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].code(), SchemaErrorCode::HeaderMismatch);
        assert_eq!(report.errors[0].sheet_name(), "Sheet2");
        assert_eq!(report.errors[1].code(), SchemaErrorCode::TypeMismatch);
        assert_eq!(report.errors[1].sheet_name(), "Sheet3");
    }

    #[test]
    fn test_compile_is_repeatable() {
        let workbook = Workbook::new(vec![good_sheet("Sheet1"), good_sheet("Sheet2")]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);

        let first = compiler.compile();
        let second = compiler.compile();
        assert_eq!(first.schema, second.schema);
        assert_eq!(first.success, second.success);
    }

    #[test]
    fn test_all_sheets_empty() {
        let workbook = Workbook::new(vec![Sheet::new("Sheet1", vec![])]);
        let report = TableCompiler::new("Test.json", "Entity_Test", &workbook).compile();
        assert!(report.success);
        assert!(report.schema.is_none());
    }

    #[test]
    fn test_need_compile_without_descriptor() {
        let workbook = Workbook::new(vec![good_sheet("Sheet1")]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);
        assert!(compiler.need_compile(None));
    }

    #[test]
    fn test_need_compile_matches_descriptor() {
        let workbook = Workbook::new(vec![good_sheet("Sheet1")]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);
        let schema = compiler.compile().schema.unwrap();
        let descriptor = CompiledDescriptor::from_schema(&schema);

        assert!(!compiler.need_compile(Some(&descriptor)));

        let changed = CompiledDescriptor::new(
            "Entity_Test",
            vec!["id".into(), "name".into()],
            vec!["int".into(), "bool".into()],
        );
        assert!(compiler.need_compile(Some(&changed)));
    }

    #[test]
    fn test_need_compile_looks_at_first_sheet_only() {
        let workbook = Workbook::new(vec![
            good_sheet("Sheet1"),
            sheet("Sheet2", &["other"], &["float"]),
        ]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);
        let descriptor = CompiledDescriptor::new(
            "Entity_Test",
            vec!["id".into(), "name".into()],
            vec!["int".into(), "string".into()],
        );
        assert!(!compiler.need_compile(Some(&descriptor)));
    }

    #[test]
    fn test_need_compile_on_broken_first_sheet() {
        let workbook = Workbook::new(vec![sheet("Sheet1", &["id"], &["integer"])]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);
        let descriptor = CompiledDescriptor::new("Entity_Test", vec!["id".into()], vec!["int".into()]);
        assert!(compiler.need_compile(Some(&descriptor)));
    }

    #[test]
    fn test_compile_with_registers_descriptor() {
        let workbook = Workbook::new(vec![good_sheet("Sheet1")]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);
        let generator = CodeGenerator::new(Language::CSharp);
        let mut registry = DescriptorRegistry::new();

        let outcome = compiler.compile_with(&generator, &mut registry).unwrap();

        let declaration = outcome.declaration.unwrap();
        assert!(declaration.contains("public class Entity_Test"));
        assert_eq!(
            registry.get("Entity_Test").unwrap().field_types,
            vec!["int", "string"]
        );
        assert!(!compiler.need_compile(registry.get("Entity_Test")));
    }

    #[test]
    fn test_compile_with_failure_generates_nothing() {
        let workbook = Workbook::new(vec![
            good_sheet("Sheet1"),
            sheet("Sheet2", &["id"], &["int"]),
        ]);
        let compiler = TableCompiler::new("Test.json", "Entity_Test", &workbook);
        let generator = CodeGenerator::new(Language::CSharp);
        let mut registry = DescriptorRegistry::new();

        let outcome = compiler.compile_with(&generator, &mut registry).unwrap();

        assert!(!outcome.report.success);
        assert!(outcome.declaration.is_none());
        assert!(registry.is_empty());
    }
}
