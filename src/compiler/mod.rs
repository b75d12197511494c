//! Compilation orchestration
//!
//! Ties the schema parser, the code generator and the descriptor registry
//! together for one source at a time.

mod descriptor;
mod errors;
mod orchestrator;

pub use descriptor::{CompiledDescriptor, DescriptorRegistry};
pub use errors::{CompileError, CompileResult};
pub use orchestrator::{CompileOutcome, CompileReport, CompileSummary, TableCompiler};
