//! Command-line interface
//!
//! - check: load the schema directory and list what was registered
//! - validate: validate one JSON object and print its outcome
//! - batch: validate JSON request lines from stdin
//! - columns: print column definitions for a schema

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{batch, check, columns, run, run_command, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_object, read_requests, write_json, write_response};
