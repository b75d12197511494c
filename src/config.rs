//! Importer configuration
//!
//! Loaded from a JSON file. Only the three output directories are
//! required; everything else has a default.
//!
//! ```json
//! {
//!   "entity_dir": "Generated/TableEntity",
//!   "container_dir": "Generated/TableContainer",
//!   "data_dir": "Generated/TableData",
//!   "language": "csharp"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codegen::{is_identifier, CodegenError, CodegenResult, Language};
use crate::loader::{CoercionPolicy, LoadOptions};
use crate::observability::{log_event_with_fields, Event};

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output directory of entity declarations (required)
    pub entity_dir: PathBuf,

    /// Output directory of container declarations (required)
    pub container_dir: PathBuf,

    /// Output directory of compiled record data (required)
    pub data_dir: PathBuf,

    /// Target language of declarations (default: csharp)
    #[serde(default)]
    pub language: Language,

    /// Entity template file; the built-in template when absent
    #[serde(default)]
    pub entity_template: Option<PathBuf>,

    /// Container template file; the built-in template when absent
    #[serde(default)]
    pub container_template: Option<PathBuf>,

    #[serde(default = "default_entity_prefix")]
    pub entity_prefix: String,

    #[serde(default = "default_container_prefix")]
    pub container_prefix: String,

    /// Source file extensions handled, without the dot (default: ["json"])
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Log a line per imported source (default: true)
    #[serde(default = "default_log_on_import")]
    pub log_on_import: bool,

    /// Row handling on a coercion failure (default: abort)
    #[serde(default)]
    pub on_coercion_error: CoercionPolicy,
}

fn default_entity_prefix() -> String {
    "Entity_".to_string()
}
fn default_container_prefix() -> String {
    "Scriptable_".to_string()
}
fn default_source_extensions() -> Vec<String> {
    vec!["json".to_string()]
}
fn default_log_on_import() -> bool {
    true
}

impl Config {
    /// Configuration with defaults for everything but the output directories
    pub fn new(
        entity_dir: impl Into<PathBuf>,
        container_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            entity_dir: entity_dir.into(),
            container_dir: container_dir.into(),
            data_dir: data_dir.into(),
            language: Language::default(),
            entity_template: None,
            container_template: None,
            entity_prefix: default_entity_prefix(),
            container_prefix: default_container_prefix(),
            source_extensions: default_source_extensions(),
            log_on_import: default_log_on_import(),
            on_coercion_error: CoercionPolicy::default(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("language", config.language.as_str()),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(config)
    }

    /// Validate field values. Directories are checked separately, since
    /// they may be created after the file is read.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, prefix) in [
            ("entity_prefix", &self.entity_prefix),
            ("container_prefix", &self.container_prefix),
        ] {
            if prefix.is_empty() || !is_identifier(prefix) {
                return Err(ConfigError::Invalid(format!(
                    "{} '{}' must be a non-empty identifier",
                    field, prefix
                )));
            }
        }

        // Same prefix would make both declarations collide
        if self.entity_prefix == self.container_prefix {
            return Err(ConfigError::Invalid(
                "entity_prefix and container_prefix must differ".into(),
            ));
        }

        if self.source_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "source_extensions must not be empty".into(),
            ));
        }
        for ext in &self.source_extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::Invalid(format!(
                    "source extension '{}' must be given without a dot",
                    ext
                )));
            }
        }

        Ok(())
    }

    /// Fails with `MissingOutputDirectory` for the first absent output directory
    pub fn check_output_dirs(&self) -> CodegenResult<()> {
        for dir in [&self.entity_dir, &self.container_dir, &self.data_dir] {
            if !dir.is_dir() {
                return Err(CodegenError::MissingOutputDirectory(dir.clone()));
            }
        }
        Ok(())
    }

    /// Whether `path` is a source this configuration handles
    pub fn handles(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.source_extensions
            .iter()
            .any(|handled| handled.eq_ignore_ascii_case(ext))
    }

    pub fn entity_name(&self, stem: &str) -> String {
        format!("{}{}", self.entity_prefix, stem)
    }

    pub fn container_name(&self, stem: &str) -> String {
        format!("{}{}", self.container_prefix, stem)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            on_coercion_error: self.on_coercion_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("tablec.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"entity_dir":"e","container_dir":"c","data_dir":"d"}"#,
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.language, Language::CSharp);
        assert_eq!(config.entity_prefix, "Entity_");
        assert_eq!(config.container_prefix, "Scriptable_");
        assert_eq!(config.source_extensions, vec!["json"]);
        assert!(config.log_on_import);
        assert_eq!(config.on_coercion_error, CoercionPolicy::Abort);
        assert_eq!(config, Config::new("e", "c", "d"));
    }

    #[test]
    fn test_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"entity_dir":"e","container_dir":"c","data_dir":"d",
                "language":"rust","entity_prefix":"Row_","source_extensions":["json","xlsx"],
                "log_on_import":false,"on_coercion_error":"skip_row"}"#,
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.language, Language::Rust);
        assert_eq!(config.entity_name("Items"), "Row_Items");
        assert!(config.handles(Path::new("tables/Items.XLSX")));
        assert_eq!(config.load_options(), LoadOptions::skip_invalid_rows());
    }

    #[test]
    fn test_missing_required_field() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"entity_dir":"e"}"#);
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_validate_rejects_equal_prefixes() {
        let mut config = Config::new("e", "c", "d");
        config.container_prefix = config.entity_prefix.clone();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config = Config::new("e", "c", "d");
        config.source_extensions = vec![".json".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_check_output_dirs() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path(), dir.path(), dir.path().join("absent"));
        assert!(matches!(
            config.check_output_dirs(),
            Err(CodegenError::MissingOutputDirectory(_))
        ));

        let config = Config::new(dir.path(), dir.path(), dir.path());
        assert!(config.check_output_dirs().is_ok());
    }
}
