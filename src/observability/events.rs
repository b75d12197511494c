//! Observable lifecycle events
//!
//! Events are explicit and typed; each maps to one stable string.

use std::fmt;

/// Observable events of the compile and import pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,

    // Compilation
    /// Schema compilation of a source begins
    CompileStart,
    /// Schema compiled and declaration rendered
    CompileComplete,
    /// Existing descriptor still matches, nothing regenerated
    CompileSkipped,
    /// At least one sheet was rejected
    CompileFailed,
    /// One sheet's schema was rejected
    SheetRejected,
    /// Generated declaration written to disk
    DeclarationWritten,

    // Loading
    /// Records loaded from a source
    LoadComplete,
    /// Load aborted on a coercion failure
    LoadAborted,
    /// A row was dropped in row-skip mode
    RowSkipped,

    // Host hooks
    /// Descriptor registry flushed on reload
    RegistryFlushed,
    /// Artifacts of a removed source deleted
    ArtifactsRemoved,
    /// Source path not handled by any reader
    SourceIgnored,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::CompileStart => "COMPILE_BEGIN",
            Event::CompileComplete => "COMPILE_COMPLETE",
            Event::CompileSkipped => "COMPILE_SKIPPED",
            Event::CompileFailed => "COMPILE_FAILED",
            Event::SheetRejected => "SHEET_REJECTED",
            Event::DeclarationWritten => "DECLARATION_WRITTEN",

            Event::LoadComplete => "LOAD_COMPLETE",
            Event::LoadAborted => "LOAD_ABORTED",
            Event::RowSkipped => "ROW_SKIPPED",

            Event::RegistryFlushed => "REGISTRY_FLUSHED",
            Event::ArtifactsRemoved => "ARTIFACTS_REMOVED",
            Event::SourceIgnored => "SOURCE_IGNORED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::CompileFailed | Event::SheetRejected | Event::LoadAborted
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::CompileStart,
            Event::CompileComplete,
            Event::CompileSkipped,
            Event::CompileFailed,
            Event::SheetRejected,
            Event::DeclarationWritten,
            Event::LoadComplete,
            Event::LoadAborted,
            Event::RowSkipped,
            Event::RegistryFlushed,
            Event::ArtifactsRemoved,
            Event::SourceIgnored,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::LoadAborted.is_failure());
        assert!(Event::SheetRejected.is_failure());
        assert!(!Event::CompileSkipped.is_failure());
    }
}
