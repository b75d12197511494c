//! CLI argument definitions using clap
//!
//! Commands:
//! - tablec compile --config <path> <sources>...
//! - tablec remove --config <path> <sources>...
//! - tablec check <source>
//! - tablec render <source> [--language csharp|rust]
//! - tablec load <source>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::codegen::Language;

/// tablec - spreadsheet schema compiler and typed row loader
#[derive(Parser, Debug)]
#[command(name = "tablec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only log warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile changed sources: regenerate declarations and write record data
    Compile {
        /// Path to configuration file
        #[arg(long, default_value = "./tablec.json")]
        config: PathBuf,

        /// Source workbooks
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Delete the generated artifacts of removed sources
    Remove {
        /// Path to configuration file
        #[arg(long, default_value = "./tablec.json")]
        config: PathBuf,

        /// Source workbooks that were removed
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Compile the schema of a source and report, writing nothing
    Check {
        source: PathBuf,

        /// Prefix of the entity name
        #[arg(long, default_value = "Entity_")]
        prefix: String,
    },

    /// Print the entity declaration of a source
    Render {
        source: PathBuf,

        /// Target language
        #[arg(long, default_value = "csharp")]
        language: Language,

        /// Entity template file, instead of the built-in one
        #[arg(long)]
        template: Option<PathBuf>,

        /// Prefix of the entity name
        #[arg(long, default_value = "Entity_")]
        prefix: String,
    },

    /// Load the records of a source and print them
    Load {
        source: PathBuf,

        /// Drop rows that fail to coerce instead of failing
        #[arg(long)]
        skip_invalid_rows: bool,

        /// Prefix of the entity name
        #[arg(long, default_value = "Entity_")]
        prefix: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
