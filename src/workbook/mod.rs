//! Workbook model consumed by the schema compiler and row loader
//!
//! The container format itself is opaque to the core: a `WorkbookReader`
//! turns a file into a `Workbook` and closes it before returning.
//!
//! - `Cell`: one untyped value with its kind
//! - `Row`: sparse ordered cells
//! - `Sheet`: named rows, any of which may be absent
//! - `Workbook`: ordered sheets

mod cell;
mod errors;
mod reader;

pub use cell::{CachedResult, Cell, CellKind, Row, Sheet, Workbook};
pub use errors::{WorkbookError, WorkbookResult};
pub use reader::{JsonWorkbookReader, WorkbookReader};
