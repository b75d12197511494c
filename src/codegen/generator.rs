//! Declaration generator
//!
//! `render` is pure: the same schema and entity name always produce the
//! same text. Writing to disk is a separate step.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::Config;
use crate::schema::TableSchema;

use super::errors::{CodegenError, CodegenResult};
use super::renderer::{DeclarationRenderer, Language};
use super::template::{
    quote_list, Template, CONTAINER_NAME, ENTITY_NAME, ENUM_DEF, FIELDS, FIELD_NAMES,
    FIELD_TYPES, SOURCE_PATH,
};

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

/// Returns true if `value` can be emitted as an identifier
pub fn is_identifier(value: &str) -> bool {
    identifier_pattern().is_match(value)
}

fn check_identifier(context: &str, value: &str) -> CodegenResult<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(CodegenError::InvalidIdentifier {
            context: context.to_string(),
            value: value.to_string(),
        })
    }
}

/// Renders entity and container declarations for one target language
pub struct CodeGenerator {
    renderer: Box<dyn DeclarationRenderer>,
    entity_template: Template,
    container_template: Template,
}

impl CodeGenerator {
    /// Generator with the built-in templates of `language`
    pub fn new(language: Language) -> Self {
        Self::with_renderer(language.renderer())
    }

    pub fn with_renderer(renderer: Box<dyn DeclarationRenderer>) -> Self {
        let entity_template = Template::new(renderer.entity_template());
        let container_template = Template::new(renderer.container_template());
        Self {
            renderer,
            entity_template,
            container_template,
        }
    }

    /// Generator for a configuration, loading any template overrides
    pub fn from_config(config: &Config) -> CodegenResult<Self> {
        let mut generator = Self::new(config.language);
        if let Some(path) = &config.entity_template {
            generator.entity_template = Template::load(path)?;
        }
        if let Some(path) = &config.container_template {
            generator.container_template = Template::load(path)?;
        }
        Ok(generator)
    }

    pub fn with_entity_template(mut self, template: Template) -> Self {
        self.entity_template = template;
        self
    }

    pub fn with_container_template(mut self, template: Template) -> Self {
        self.container_template = template;
        self
    }

    pub fn language(&self) -> Language {
        self.renderer.language()
    }

    pub fn file_extension(&self) -> &'static str {
        self.renderer.file_extension()
    }

    /// Renders the entity declaration for `schema`.
    ///
    /// Members and enums appear in column order; enum values in domain order.
    pub fn render(&self, schema: &TableSchema, entity_name: &str) -> CodegenResult<String> {
        check_identifier("entity name", entity_name)?;
        for column in &schema.columns {
            check_identifier("column name", &column.name)?;
            if let Some(domain) = column.enum_domain() {
                for value in domain {
                    check_identifier(&format!("enum '{}'", column.name), value)?;
                }
            }
        }

        let field_names = quote_list(&schema.field_names());
        let field_types = quote_list(&schema.field_types());

        let fields: Vec<String> = schema
            .columns
            .iter()
            .map(|column| self.renderer.field_line(entity_name, column))
            .collect();
        let fields = fields.join("\n");

        let enum_defs: String = schema
            .columns
            .iter()
            .filter_map(|column| {
                column
                    .enum_domain()
                    .map(|domain| self.renderer.enum_block(entity_name, column, domain))
            })
            .collect();

        Ok(self.entity_template.fill(&[
            (ENTITY_NAME, entity_name),
            (FIELD_NAMES, &field_names),
            (FIELD_TYPES, &field_types),
            (FIELDS, &fields),
            (ENUM_DEF, &enum_defs),
        ]))
    }

    /// Renders the container declaration holding the records of `entity_name`
    pub fn render_container(
        &self,
        container_name: &str,
        entity_name: &str,
        source_path: &Path,
    ) -> CodegenResult<String> {
        check_identifier("container name", container_name)?;
        check_identifier("entity name", entity_name)?;

        let source = source_path.to_string_lossy().replace('\\', "/");
        Ok(self.container_template.fill(&[
            (CONTAINER_NAME, container_name),
            (ENTITY_NAME, entity_name),
            (SOURCE_PATH, &source),
        ]))
    }

    /// Path of the declaration file for `type_name` inside `dir`
    pub fn declaration_path(&self, dir: &Path, type_name: &str) -> PathBuf {
        dir.join(format!("{}.{}", type_name, self.file_extension()))
    }
}

/// Writes `text` to `dir/file_name`; `dir` must already exist
pub fn write_declaration(dir: &Path, file_name: &str, text: &str) -> CodegenResult<PathBuf> {
    if !dir.is_dir() {
        return Err(CodegenError::MissingOutputDirectory(dir.to_path_buf()));
    }
    let path = dir.join(file_name);
    fs::write(&path, text).map_err(|source| CodegenError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
