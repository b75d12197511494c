//! Typed row loading
//!
//! Turns the body rows of a workbook into records under a compiled
//! schema. Loading is all-or-nothing by default: the first cell that
//! cannot be coerced fails the load and no partial list is returned.

mod binding;
mod errors;
mod row_loader;
mod value;

pub use binding::{RecordBinding, TableEntity};
pub use errors::{LoadError, LoadErrorCode, LoadResult};
pub use row_loader::{load, load_with_registry, CoercionPolicy, LoadOptions, RowLoader};
pub use value::{Record, Value};
