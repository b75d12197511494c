//! Importer
//!
//! Drives compile, generate and load for spreadsheet sources in response to
//! host file events. A failure in one source is reported in its outcome and
//! never stops the remaining sources; configuration failures stop the run.

mod errors;
mod outcome;
mod pipeline;

pub use errors::{ImportError, ImportResult};
pub use outcome::{ImportSummary, RemovalSummary, SourceOutcome, SourceStatus};
pub use pipeline::Importer;
