//! tablec - spreadsheet schema compiler and typed row loader
//!
//! A source workbook declares its own schema in its first two rows: field
//! names, then field types (`int`, `bool`, `float`, `string`,
//! `enum|a,b,c`). tablec compiles that schema into a declaration in a host
//! language, and loads the remaining rows as typed records.
//!
//! Pipeline:
//! - `workbook`: in-memory cells, and readers that produce them
//! - `schema`: parses the two schema rows of every sheet
//! - `compiler`: checks sheets agree and drives generation
//! - `codegen`: renders declarations from templates
//! - `loader`: coerces body rows into records
//! - `importer`: host hooks for changed, removed and reloaded sources

pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod importer;
pub mod loader;
pub mod observability;
pub mod schema;
pub mod workbook;
