//! CLI command implementations
//!
//! `compile` and `remove` run the importer hooks against a configuration.
//! `check`, `render` and `load` work on a single source without touching
//! any output directory.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::codegen::{CodeGenerator, Language, Template};
use crate::compiler::{CompileReport, TableCompiler};
use crate::config::Config;
use crate::importer::Importer;
use crate::loader::{LoadOptions, RowLoader};
use crate::observability::{Logger, Severity};
use crate::schema::TableSchema;
use crate::workbook::{JsonWorkbookReader, Workbook, WorkbookError, WorkbookReader};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    if cli.quiet {
        Logger::set_threshold(Severity::Warn);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Compile { config, sources } => compile(&config, &sources),
        Command::Remove { config, sources } => remove(&config, &sources),
        Command::Check { source, prefix } => check(&source, &prefix),
        Command::Render {
            source,
            language,
            template,
            prefix,
        } => render(&source, language, template.as_deref(), &prefix),
        Command::Load {
            source,
            skip_invalid_rows,
            prefix,
        } => load(&source, skip_invalid_rows, &prefix),
    }
}

/// Import changed sources as the host would
pub fn compile(config_path: &Path, sources: &[PathBuf]) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let mut importer = Importer::new(config)?;

    let summary = importer.on_sources_changed(sources)?;
    write_response(serde_json::to_value(&summary)?)?;

    if summary.has_failures() {
        let failed = summary
            .sources
            .iter()
            .filter(|s| s.status.is_failure())
            .count();
        return Err(CliError::import_failed(format!(
            "{} of {} sources failed",
            failed,
            summary.sources.len()
        )));
    }
    Ok(())
}

/// Remove the artifacts of deleted sources
pub fn remove(config_path: &Path, sources: &[PathBuf]) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let importer = Importer::new(config)?;

    let summary = importer.on_sources_removed(sources)?;
    write_response(serde_json::to_value(&summary)?)
}

/// Compile one source and report without writing anything
pub fn check(source: &Path, prefix: &str) -> CliResult<()> {
    let (workbook, source_name, entity) = open_source(source, prefix)?;
    let report = TableCompiler::new(source_name, entity, &workbook).compile();

    write_response(serde_json::to_value(report.summary())?)?;
    if !report.success {
        return Err(CliError::schema_rejected(format!(
            "{} sheet(s) rejected",
            report.errors.len()
        )));
    }
    Ok(())
}

/// Print the entity declaration of one source
pub fn render(
    source: &Path,
    language: Language,
    template: Option<&Path>,
    prefix: &str,
) -> CliResult<()> {
    let (workbook, source_name, entity) = open_source(source, prefix)?;
    let report = TableCompiler::new(source_name, entity.as_str(), &workbook).compile();
    let schema = ensure_compiled(&report)?;

    let mut generator = CodeGenerator::new(language);
    if let Some(path) = template {
        generator = generator.with_entity_template(Template::load(path)?);
    }
    write_text(&generator.render(schema, &entity)?)
}

/// Print the records of one source
pub fn load(source: &Path, skip_invalid_rows: bool, prefix: &str) -> CliResult<()> {
    let (workbook, source_name, entity) = open_source(source, prefix)?;
    let report = TableCompiler::new(source_name.as_str(), entity.as_str(), &workbook).compile();
    let schema = ensure_compiled(&report)?;

    let options = if skip_invalid_rows {
        LoadOptions::skip_invalid_rows()
    } else {
        LoadOptions::default()
    };
    let records = RowLoader::new(schema, &source_name)
        .with_options(options)
        .load_workbook(&workbook)?;

    write_response(json!({
        "entity": entity,
        "count": records.len(),
        "records": records,
    }))
}

/// Opens a source with the JSON reader; returns the workbook, the source
/// file name, and the entity name
fn open_source(path: &Path, prefix: &str) -> CliResult<(Workbook, String, String)> {
    let reader = JsonWorkbookReader::new();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !reader.extensions().iter().any(|h| h.eq_ignore_ascii_case(ext)) {
        return Err(WorkbookError::UnsupportedFormat(ext.to_string()).into());
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::source_error(format!("Bad source name '{}'", path.display())))?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.to_string());

    let workbook = reader.open(path)?;
    Ok((workbook, source_name, format!("{}{}", prefix, stem)))
}

/// The compiled schema, or the joined error messages as a CLI error
fn ensure_compiled(report: &CompileReport) -> CliResult<&TableSchema> {
    if !report.success {
        return Err(CliError::schema_rejected(report.error_messages().join("; ")));
    }
    report
        .schema
        .as_ref()
        .ok_or_else(|| CliError::schema_rejected("No sheet declares a schema"))
}
