//! Observability for the compile and import pipeline
//!
//! - Structured logging (one JSON object per line, stderr)
//! - Typed lifecycle events
//!
//! # Usage
//!
//! ```ignore
//! use tablec::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CompileComplete, &[("source", "Items.json")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields.
///
/// Failure events are written at WARN, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::SheetRejected, &[("sheet", "Sheet2")]);
    }
}
