//! Schema subsystem
//!
//! Turns the two schema rows of each sheet (names, then types) into an
//! ordered `TableSchema`.
//!
//! # Design Principles
//!
//! - Closed type set: int, bool, float, string, enum
//! - Column order is the binding contract
//! - Names are trimmed and lowercase
//! - A schema error rejects one sheet, never its siblings
//! - Deterministic parsing

mod errors;
mod parser;
mod registry;
mod types;

pub use errors::{CellLocation, SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use parser::{CanonicalSchema, SheetParser, SheetSchema};
pub use registry::{has_type, parse_type_cell, TypeCellError};
pub use types::{ColumnSchema, ColumnType, TableSchema, TypeTag};
