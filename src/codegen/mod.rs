//! Declaration code generation
//!
//! Turns a compiled `TableSchema` into source text for a host language:
//! one entity declaration (a record type with one member per column and a
//! nested enum per enum column) and one container declaration holding the
//! loaded records.
//!
//! Templates are text with `#SYMBOL#` placeholders. Built-in templates
//! exist for C# and Rust; either can be replaced by a file.

mod errors;
mod generator;
mod renderer;
mod template;

pub use errors::{CodegenError, CodegenResult};
pub use generator::{is_identifier, write_declaration, CodeGenerator};
pub use renderer::{CSharpRenderer, DeclarationRenderer, Language, RustRenderer};
pub use template::{
    extract_descriptor, marker_value, quote_list, unquote_list, Template, CONTAINER_NAME,
    ENTITY_NAME, ENUM_DEF, FIELDS, FIELD_NAMES, FIELD_TYPES, MARKER_ENTITY, MARKER_FIELD_NAMES,
    MARKER_FIELD_TYPES, SOURCE_PATH,
};
