//! Validation engine
//!
//! Per field, in declaration order:
//! 1. coercion
//! 2. default application (absent keys only)
//! 3. required / null handling
//! 4. type, format, min, max, enum (see `rules`)
//!
//! The first failing rule wins; a field never has more than one error.
//! Fields are independent, so declaration order never changes which
//! errors fire.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::coerce::coerce;
use super::errors::{ValidationCode, ValidationError};
use super::messages;
use super::rules::check_present_value;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{DefaultValue, FieldType, Schema, SchemaField};

/// Engine switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Convert coercible representations (e.g. `"42"` → `42`) before type checks
    pub coerce: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { coerce: true }
    }
}

/// Output of one validation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// Whitelisted data after coercion and defaults, in declaration order
    pub data: Map<String, Value>,
    /// At most one error per field, in declaration order
    pub errors: Vec<ValidationError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

/// Stateless validator. Safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validates `data` against `schema`.
    ///
    /// Keys not declared by the schema are dropped from the output.
    pub fn validate(&self, schema: &Schema, data: &Map<String, Value>) -> Validation {
        let mut out = Map::new();
        let mut errors = Vec::new();

        for field in schema.fields() {
            let value = self.resolve(field, data.get(&field.name));
            if let Some(err) = check_field(field, value.as_ref()) {
                errors.push(err);
            }
            if let Some(value) = value {
                out.insert(field.name.clone(), value);
            }
        }

        let count = errors.len().to_string();
        log_event_with_fields(
            Event::RecordValidated,
            &[("schema", schema.name()), ("errors", &count)],
        );

        Validation { data: out, errors }
    }

    /// Steps 1 and 2: coercion, then defaults for absent keys.
    fn resolve(&self, field: &SchemaField, input: Option<&Value>) -> Option<Value> {
        match input {
            Some(value) if self.options.coerce => {
                Some(coerce(&field.field_type, value).unwrap_or_else(|| value.clone()))
            }
            Some(value) => Some(value.clone()),
            None => field.default.as_ref().map(|d| default_value(&field.field_type, d)),
        }
    }
}

fn default_value(field_type: &FieldType, default: &DefaultValue) -> Value {
    match default {
        DefaultValue::Literal(value) => value.clone(),
        DefaultValue::Now => {
            let now = Utc::now();
            match field_type {
                FieldType::Date => Value::String(now.format("%Y-%m-%d").to_string()),
                _ => Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            }
        }
    }
}

/// Step 3 onwards for one resolved value.
fn check_field(field: &SchemaField, value: Option<&Value>) -> Option<ValidationError> {
    match value {
        None if field.required => Some(required(field)),
        None => None,
        Some(Value::Null) => check_null(field),
        Some(value) => check_present_value(field, value),
    }
}

fn check_null(field: &SchemaField) -> Option<ValidationError> {
    if field.accepts_null() {
        return None;
    }
    if field.required {
        return Some(required(field));
    }

    let title = field.title();
    if field.enum_values.is_empty() {
        Some(ValidationError::new(
            &field.name,
            ValidationCode::Type,
            messages::type_mismatch(&title, field.field_type.type_name()),
        ))
    } else {
        Some(ValidationError::new(
            &field.name,
            ValidationCode::Enum,
            messages::enumeration(&title, &field.enum_values),
        ))
    }
}

fn required(field: &SchemaField) -> ValidationError {
    ValidationError::new(
        &field.name,
        ValidationCode::Required,
        messages::required(&field.title()),
    )
}

/// Validates with default options.
pub fn validate(schema: &Schema, data: &Map<String, Value>) -> Validation {
    Validator::new().validate(schema, data)
}
