//! Host integration hooks
//!
//! The host calls `on_sources_changed` with created or modified source
//! paths, `on_sources_removed` with deleted ones, and `on_reload` after it
//! has reloaded generated declarations. Everything the importer produces
//! goes to the three configured output directories:
//!
//! - `entity_dir/<entity_prefix><stem>.<ext>`: entity declaration
//! - `container_dir/<container_prefix><stem>.<ext>`: container declaration
//! - `data_dir/<container_prefix><stem>.json`: loaded records

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codegen::{write_declaration, CodeGenerator, CodegenError};
use crate::compiler::{CompileError, DescriptorRegistry, TableCompiler};
use crate::config::Config;
use crate::loader::load_with_registry;
use crate::observability::{log_event_with_fields, Event};
use crate::workbook::{JsonWorkbookReader, Workbook, WorkbookReader, WorkbookResult};

use super::errors::{ImportError, ImportResult};
use super::outcome::{ImportSummary, RemovalSummary, SourceOutcome, SourceStatus};

const LOCK_FILE_PREFIX: &str = "~$";
const DATA_EXTENSION: &str = "json";

/// Compiles and loads spreadsheet sources on behalf of a host
pub struct Importer {
    config: Config,
    generator: CodeGenerator,
    registry: DescriptorRegistry,
    readers: Vec<Box<dyn WorkbookReader>>,
}

impl Importer {
    /// Validates the configuration, loads templates, and rebuilds the
    /// descriptor registry from the entity directory.
    ///
    /// Missing templates or output directories fail here, before any
    /// source is touched.
    pub fn new(config: Config) -> ImportResult<Self> {
        config.validate()?;
        config.check_output_dirs()?;
        let generator = CodeGenerator::from_config(&config)?;

        let mut registry = DescriptorRegistry::new();
        registry.load_dir(&config.entity_dir)?;

        Ok(Self {
            config,
            generator,
            registry,
            readers: vec![Box::new(JsonWorkbookReader::new())],
        })
    }

    /// Adds a container reader. Later readers win for shared extensions.
    pub fn with_reader(mut self, reader: Box<dyn WorkbookReader>) -> Self {
        self.readers.push(reader);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Imports each changed source in order
    pub fn on_sources_changed(&mut self, paths: &[PathBuf]) -> ImportResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for path in paths {
            summary.sources.push(self.import_source(path)?);
        }
        Ok(summary)
    }

    /// Deletes the generated artifacts of each removed source.
    ///
    /// Artifacts that do not exist are skipped. The descriptor registry is
    /// left as it is until the next reload.
    pub fn on_sources_removed(&self, paths: &[PathBuf]) -> ImportResult<RemovalSummary> {
        let mut summary = RemovalSummary::default();

        for path in paths {
            let Some(stem) = self.source_stem(path) else {
                continue;
            };
            let entity = self.config.entity_name(stem);
            let container = self.config.container_name(stem);

            let artifacts = [
                self.generator
                    .declaration_path(&self.config.entity_dir, &entity),
                self.generator
                    .declaration_path(&self.config.container_dir, &container),
                self.data_path(&container),
            ];

            let mut removed = 0;
            for artifact in artifacts {
                match fs::remove_file(&artifact) {
                    Ok(()) => {
                        summary.removed.push(artifact);
                        removed += 1;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(source) => {
                        return Err(ImportError::Remove {
                            path: artifact,
                            source,
                        })
                    }
                }
            }

            let removed = removed.to_string();
            log_event_with_fields(
                Event::ArtifactsRemoved,
                &[("entity", &entity), ("removed", &removed)],
            );
        }

        Ok(summary)
    }

    /// Flushes the registry and rebuilds it from the entity directory.
    /// Returns the number of descriptors loaded.
    pub fn on_reload(&mut self) -> ImportResult<usize> {
        self.registry.flush_all();
        Ok(self.registry.load_dir(&self.config.entity_dir)?)
    }

    fn import_source(&mut self, path: &Path) -> ImportResult<SourceOutcome> {
        let Some(stem) = self.source_stem(path) else {
            log_event_with_fields(
                Event::SourceIgnored,
                &[("source", &path.display().to_string())],
            );
            return Ok(SourceOutcome::ignored(path));
        };
        let stem = stem.to_string();
        let entity = self.config.entity_name(&stem);
        let container = self.config.container_name(&stem);
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());

        let workbook = match self.open(path) {
            Some(Ok(workbook)) => workbook,
            Some(Err(e)) => {
                let status = SourceStatus::Unreadable {
                    error: e.to_string(),
                };
                return Ok(SourceOutcome::for_entity(path, &entity, status));
            }
            None => {
                log_event_with_fields(
                    Event::SourceIgnored,
                    &[("source", &path.display().to_string())],
                );
                return Ok(SourceOutcome::ignored(path));
            }
        };

        let mut written = Vec::new();
        let compiler = TableCompiler::new(source_name.as_str(), entity.as_str(), &workbook);

        let compiled = if compiler.need_compile(self.registry.get(&entity)) {
            let outcome = match compiler.compile_with(&self.generator, &mut self.registry) {
                Ok(outcome) => outcome,
                Err(CompileError::Codegen(e @ CodegenError::InvalidIdentifier { .. })) => {
                    return Ok(generation_failed(path, &entity, &source_name, e));
                }
                Err(e) => return Err(e.into()),
            };
            if !outcome.report.success {
                let status = SourceStatus::Rejected {
                    errors: outcome.report.error_messages(),
                };
                return Ok(SourceOutcome::for_entity(path, &entity, status));
            }
            let Some(declaration) = outcome.declaration else {
                return Ok(SourceOutcome::for_entity(path, &entity, SourceStatus::Empty));
            };

            let container_text = match self.generator.render_container(&container, &entity, path) {
                Ok(text) => text,
                Err(e @ CodegenError::InvalidIdentifier { .. }) => {
                    return Ok(generation_failed(path, &entity, &source_name, e));
                }
                Err(e) => return Err(e.into()),
            };
            written.push(self.write_declaration(&self.config.entity_dir, &entity, &declaration)?);
            written.push(self.write_declaration(
                &self.config.container_dir,
                &container,
                &container_text,
            )?);
            true
        } else {
            log_event_with_fields(
                Event::CompileSkipped,
                &[("entity", &entity), ("source", &source_name)],
            );
            false
        };

        let records = match load_with_registry(
            &self.registry,
            &entity,
            &source_name,
            &workbook,
            self.config.load_options(),
        ) {
            Ok(records) => records,
            Err(e) => {
                let mut outcome = SourceOutcome::for_entity(
                    path,
                    &entity,
                    SourceStatus::LoadFailed {
                        error: e.to_string(),
                    },
                );
                outcome.written = written;
                return Ok(outcome);
            }
        };

        let data = serde_json::to_string_pretty(&records)?;
        let data_file = format!("{}.{}", container, DATA_EXTENSION);
        written.push(write_declaration(&self.config.data_dir, &data_file, &data)?);

        if self.config.log_on_import {
            let count = records.len().to_string();
            log_event_with_fields(
                Event::LoadComplete,
                &[("entity", &entity), ("records", &count), ("source", &source_name)],
            );
        }

        let status = if compiled {
            SourceStatus::Compiled {
                records: records.len(),
            }
        } else {
            SourceStatus::Unchanged {
                records: records.len(),
            }
        };
        let mut outcome = SourceOutcome::for_entity(path, &entity, status);
        outcome.written = written;
        Ok(outcome)
    }

    /// Stem of a handled source; None for unhandled extensions and editor
    /// lock files
    fn source_stem<'p>(&self, path: &'p Path) -> Option<&'p str> {
        if !self.config.handles(path) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem.starts_with(LOCK_FILE_PREFIX) {
            return None;
        }
        Some(stem)
    }

    /// Opens `path` with the last registered reader for its extension
    fn open(&self, path: &Path) -> Option<WorkbookResult<Workbook>> {
        let ext = path.extension()?.to_str()?;
        let reader = self.readers.iter().rev().find(|reader| {
            reader
                .extensions()
                .iter()
                .any(|handled| handled.eq_ignore_ascii_case(ext))
        })?;
        Some(reader.open(path))
    }

    fn write_declaration(&self, dir: &Path, type_name: &str, text: &str) -> ImportResult<PathBuf> {
        let file_name = format!("{}.{}", type_name, self.generator.file_extension());
        let path = write_declaration(dir, &file_name, text)?;

        let path_text = path.display().to_string();
        log_event_with_fields(
            Event::DeclarationWritten,
            &[("path", &path_text), ("type", type_name)],
        );
        Ok(path)
    }

    fn data_path(&self, container: &str) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.{}", container, DATA_EXTENSION))
    }
}

/// Outcome for a source whose names cannot be declared
fn generation_failed(
    path: &Path,
    entity: &str,
    source_name: &str,
    error: CodegenError,
) -> SourceOutcome {
    let error = error.to_string();
    log_event_with_fields(
        Event::CompileFailed,
        &[("entity", entity), ("error", &error), ("source", source_name)],
    );
    SourceOutcome::for_entity(path, entity, SourceStatus::GenerationFailed { error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ITEMS: &str = r#"{"sheets":[{"name":"Sheet1","rows":[
        ["id","name","color"],
        ["int","string","enum|red,green,blue"],
        [1,"sword","Red"],
        [2,"shield","blue"]
    ]}]}"#;

    fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        for sub in ["entity", "container", "data", "tables"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        let config = Config::new(
            dir.path().join("entity"),
            dir.path().join("container"),
            dir.path().join("data"),
        );
        (dir, config)
    }

    fn write_source(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join("tables").join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_new_requires_output_dirs() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path().join("a"), dir.path(), dir.path());
        assert!(matches!(
            Importer::new(config),
            Err(ImportError::Codegen(_))
        ));
    }

    #[test]
    fn test_import_compiles_and_loads() {
        let (dir, config) = setup();
        let source = write_source(&dir, "Items.json", ITEMS);
        let mut importer = Importer::new(config).unwrap();

        let summary = importer.on_sources_changed(&[source.clone()]).unwrap();

        let outcome = summary.outcome(&source).unwrap();
        assert_eq!(outcome.status, SourceStatus::Compiled { records: 2 });
        assert_eq!(outcome.written.len(), 3);
        assert!(dir.path().join("entity/Entity_Items.cs").is_file());
        assert!(dir.path().join("container/Scriptable_Items.cs").is_file());

        let data = fs::read_to_string(dir.path().join("data/Scriptable_Items.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(json[0]["name"], "sword");
        assert_eq!(json[0]["color"], "red");
        assert_eq!(json[1]["id"], 2);
    }

    #[test]
    fn test_second_import_is_unchanged() {
        let (dir, config) = setup();
        let source = write_source(&dir, "Items.json", ITEMS);
        let mut importer = Importer::new(config).unwrap();

        importer.on_sources_changed(&[source.clone()]).unwrap();
        let summary = importer.on_sources_changed(&[source.clone()]).unwrap();

        assert_eq!(
            summary.outcome(&source).unwrap().status,
            SourceStatus::Unchanged { records: 2 }
        );
    }

    #[test]
    fn test_lock_files_and_other_extensions_are_ignored() {
        let (dir, config) = setup();
        let lock = write_source(&dir, "~$Items.json", ITEMS);
        let other = write_source(&dir, "Items.txt", ITEMS);
        let mut importer = Importer::new(config).unwrap();

        let summary = importer.on_sources_changed(&[lock, other]).unwrap();

        assert!(summary
            .sources
            .iter()
            .all(|s| s.status == SourceStatus::Ignored));
        assert!(importer.registry().is_empty());
    }

    #[test]
    fn test_unreadable_source() {
        let (dir, config) = setup();
        let source = write_source(&dir, "Broken.json", "{not json");
        let mut importer = Importer::new(config).unwrap();

        let summary = importer.on_sources_changed(&[source.clone()]).unwrap();

        assert!(matches!(
            summary.outcome(&source).unwrap().status,
            SourceStatus::Unreadable { .. }
        ));
        assert!(summary.has_failures());
    }

    #[test]
    fn test_undeclarable_stem_is_per_source() {
        let (dir, config) = setup();
        let spaced = write_source(&dir, "Item List.json", ITEMS);
        let items = write_source(&dir, "Items.json", ITEMS);
        let mut importer = Importer::new(config).unwrap();

        let summary = importer
            .on_sources_changed(&[spaced.clone(), items.clone()])
            .unwrap();

        match &summary.outcome(&spaced).unwrap().status {
            SourceStatus::GenerationFailed { error } => assert!(error.contains("Item List")),
            other => panic!("expected generation failure, got {:?}", other),
        }
        assert!(!importer.registry().contains("Entity_Item List"));
        assert_eq!(
            summary.outcome(&items).unwrap().status,
            SourceStatus::Compiled { records: 2 }
        );
    }

    #[test]
    fn test_removed_source_artifacts() {
        let (dir, config) = setup();
        let source = write_source(&dir, "Items.json", ITEMS);
        let mut importer = Importer::new(config).unwrap();
        importer.on_sources_changed(&[source.clone()]).unwrap();

        let summary = importer.on_sources_removed(&[source.clone()]).unwrap();

        assert_eq!(summary.removed.len(), 3);
        assert!(!dir.path().join("entity/Entity_Items.cs").exists());
        assert!(!dir.path().join("data/Scriptable_Items.json").exists());
        // Registry entries survive until the next reload
        assert!(importer.registry().contains("Entity_Items"));

        let again = importer.on_sources_removed(&[source]).unwrap();
        assert!(again.removed.is_empty());
    }

    #[test]
    fn test_reload_rebuilds_registry() {
        let (dir, config) = setup();
        let source = write_source(&dir, "Items.json", ITEMS);
        let mut importer = Importer::new(config).unwrap();
        importer.on_sources_changed(&[source.clone()]).unwrap();
        importer.on_sources_removed(&[source]).unwrap();

        let loaded = importer.on_reload().unwrap();

        assert_eq!(loaded, 0);
        assert!(!importer.registry().contains("Entity_Items"));
    }
}
