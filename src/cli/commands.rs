//! CLI command implementations
//!
//! Every command loads the config, applies it, then loads the schema
//! directory into a fresh registry before doing its work.

use std::path::Path;

use serde_json::{json, Map, Value};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{kind, read_object, read_requests, write_json, write_response};
use crate::config::ParsleyConfig;
use crate::error::{attempt, Outcome};
use crate::record::Record;
use crate::schema::SchemaRegistry;
use crate::validation::Validator;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { config } => check(&config),
        Command::Validate {
            schema,
            input,
            config,
        } => validate(&config, &schema, input.as_deref()),
        Command::Batch { config } => batch(&config),
        Command::Columns {
            schema,
            table,
            config,
        } => columns(&config, &schema, table.as_deref()),
    }
}

fn boot(config_path: &Path) -> CliResult<(ParsleyConfig, SchemaRegistry)> {
    let config = ParsleyConfig::load(config_path)?;
    config.apply();

    let mut registry = SchemaRegistry::with_dir(&config.schema_dir);
    registry.load_all()?;
    Ok((config, registry))
}

/// Loads the schema directory and lists every registered schema
pub fn check(config_path: &Path) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    write_response(describe_registry(&config, &registry))
}

pub(crate) fn describe_registry(config: &ParsleyConfig, registry: &SchemaRegistry) -> Value {
    let schemas: Vec<Value> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|schema| {
            json!({
                "name": schema.name(),
                "primary_key": schema.primary_key(),
                "fields": schema.describe_fields(),
            })
        })
        .collect();

    json!({
        "schema_dir": config.schema_dir.display().to_string(),
        "schemas": schemas,
    })
}

/// Validates one object and prints its `{result, error}` outcome
pub fn validate(config_path: &Path, schema: &str, input: Option<&Path>) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    registry.require(schema)?;

    let data = read_object(input)?;
    let validator = Validator::with_options(config.validation_options());
    let outcome = validate_object(&registry, &validator, schema, &data)?;
    write_json(&outcome)
}

/// Insert-path validation: construct, validate, escalate when invalid.
///
/// Validation failures come back inside the outcome; developer errors
/// (unknown schema names among them) are returned as `Err`.
pub(crate) fn validate_object(
    registry: &SchemaRegistry,
    validator: &Validator,
    schema: &str,
    data: &Map<String, Value>,
) -> CliResult<Outcome<Record>> {
    let outcome = attempt(|| {
        let record = registry.construct(schema, data)?.validate_with(validator);
        record.fail_if_invalid()?;
        Ok(record)
    })?;
    Ok(outcome)
}

/// Reads `{"schema": NAME, "data": {...}}` lines until EOF.
///
/// Malformed lines produce an error line and processing continues. Stdin
/// read failures stop the loop.
pub fn batch(config_path: &Path) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    let validator = Validator::with_options(config.validation_options());

    for request in read_requests() {
        let handled = request.and_then(|request| handle_request(&registry, &validator, &request));
        match handled {
            Ok(outcome) => write_json(&outcome)?,
            Err(e) if e.code() == &CliErrorCode::IoError => return Err(e),
            Err(e) => write_json(&cli_failure(&e))?,
        }
    }

    Ok(())
}

pub(crate) fn handle_request(
    registry: &SchemaRegistry,
    validator: &Validator,
    request: &Value,
) -> CliResult<Outcome<Record>> {
    let schema = request
        .get("schema")
        .and_then(Value::as_str)
        .ok_or_else(|| CliError::invalid_input("Request needs a string 'schema'"))?;

    let data = match request.get("data") {
        Some(Value::Object(data)) => data,
        Some(other) => {
            return Err(CliError::invalid_input(format!(
                "'data' must be an object, got {}",
                kind(other)
            )))
        }
        None => return Err(CliError::invalid_input("Request needs a 'data' object")),
    };

    registry.require(schema)?;
    validate_object(registry, validator, schema, data)
}

fn cli_failure(err: &CliError) -> Value {
    json!({
        "result": null,
        "error": {"code": err.code_str(), "message": err.message()},
    })
}

/// Prints column definitions and a CREATE TABLE statement
pub fn columns(config_path: &Path, schema: &str, table: Option<&str>) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    let schema = registry.require(schema)?;
    let table = table.unwrap_or_else(|| schema.name());

    let columns: Vec<String> = schema
        .to_column_definitions(config.dialect)
        .iter()
        .map(|column| column.to_sql())
        .collect();

    write_response(json!({
        "schema": schema.name(),
        "dialect": config.dialect.as_str(),
        "columns": columns,
        "create_table": schema.create_table_sql(table, config.dialect),
    }))
}
