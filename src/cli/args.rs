//! CLI argument definitions using clap
//!
//! Commands:
//! - parsley-schema check --config <path>
//! - parsley-schema validate --schema <name> [--input <file>] --config <path>
//! - parsley-schema batch --config <path>
//! - parsley-schema columns --schema <name> [--table <name>] --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parsley schema tooling: load schema documents, validate records, emit DDL
#[derive(Parser, Debug)]
#[command(name = "parsley-schema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every schema document and report what was registered
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./parsley.json")]
        config: PathBuf,
    },

    /// Validate one JSON object against a schema
    Validate {
        /// Schema name
        #[arg(long)]
        schema: String,

        /// JSON file to read instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, default_value = "./parsley.json")]
        config: PathBuf,
    },

    /// Validate `{"schema": ..., "data": ...}` lines from stdin
    Batch {
        /// Path to configuration file
        #[arg(long, default_value = "./parsley.json")]
        config: PathBuf,
    },

    /// Print column definitions for a schema
    Columns {
        /// Schema name
        #[arg(long)]
        schema: String,

        /// Table name for the CREATE TABLE statement (default: schema name)
        #[arg(long)]
        table: Option<String>,

        /// Path to configuration file
        #[arg(long, default_value = "./parsley.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
