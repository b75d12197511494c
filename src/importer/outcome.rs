//! Per-source results of an import run

use std::path::{Path, PathBuf};

use serde::Serialize;

/// What happened to one source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Declarations regenerated and records written
    Compiled { records: usize },
    /// Descriptor still matched; records rewritten only
    Unchanged { records: usize },
    /// No sheet had a header; nothing generated
    Empty,
    /// At least one sheet was rejected; nothing generated
    Rejected { errors: Vec<String> },
    /// A column, enum value or source name cannot be declared; nothing
    /// generated
    GenerationFailed { error: String },
    /// Declarations are current but the records could not be loaded
    LoadFailed { error: String },
    /// The workbook could not be opened
    Unreadable { error: String },
    /// Not a handled source
    Ignored,
}

impl SourceStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SourceStatus::Rejected { .. }
                | SourceStatus::GenerationFailed { .. }
                | SourceStatus::LoadFailed { .. }
                | SourceStatus::Unreadable { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceOutcome {
    pub source: PathBuf,
    pub entity: Option<String>,
    pub status: SourceStatus,
    /// Files written for this source, in write order
    pub written: Vec<PathBuf>,
}

impl SourceOutcome {
    pub(crate) fn ignored(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            entity: None,
            status: SourceStatus::Ignored,
            written: Vec::new(),
        }
    }

    pub(crate) fn for_entity(source: &Path, entity: &str, status: SourceStatus) -> Self {
        Self {
            source: source.to_path_buf(),
            entity: Some(entity.to_string()),
            status,
            written: Vec::new(),
        }
    }
}

/// Result of `on_sources_changed`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub sources: Vec<SourceOutcome>,
}

impl ImportSummary {
    pub fn has_failures(&self) -> bool {
        self.sources.iter().any(|s| s.status.is_failure())
    }

    /// Number of sources whose declarations were regenerated
    pub fn compiled_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| matches!(s.status, SourceStatus::Compiled { .. }))
            .count()
    }

    pub fn outcome(&self, source: &Path) -> Option<&SourceOutcome> {
        self.sources.iter().find(|s| s.source == source)
    }
}

/// Result of `on_sources_removed`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemovalSummary {
    /// Artifacts deleted, across all removed sources
    pub removed: Vec<PathBuf>,
}
