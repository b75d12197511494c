//! CLI module for tablec
//!
//! Provides command-line interface for:
//! - compile: Import changed sources into the configured output directories
//! - remove: Delete artifacts of removed sources
//! - check: Validate the schema rows of one source
//! - render: Print the declaration generated for one source
//! - load: Print the typed records of one source

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, compile, load, remove, render, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_text};
