//! parsley-schema: schema-bound records and a unified error model
//!
//! - `schema`: field declarations, definition-time checks, registry, SQL columns
//! - `validation`: coercion, defaults and per-field rules
//! - `record`: immutable records with validation state
//! - `error`: one error value for every failure, and the `{result, error}` contract

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod record;
pub mod schema;
pub mod validation;
