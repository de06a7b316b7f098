//! Immutable schema-bound records.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ErrorPayload, UnifiedError};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::Schema;
use crate::validation::{ValidationCode, ValidationError, Validator};

/// A schema-bound data value with validation state.
///
/// Every operation returns a new `Record`; none mutates the receiver.
///
/// Invariants:
/// - `data` keys are a subset of the schema's field names
/// - `errors` keys are a subset of the schema's field names
/// - at most one error per field
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    data: Map<String, Value>,
    errors: HashMap<String, ValidationError>,
    validated: bool,
}

fn whitelist(schema: &Schema, input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .filter(|(key, _)| schema.has_field(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Client-supplied keys: declared and not read-only
fn writable(schema: &Schema, input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .filter(|(key, _)| schema.field(key).map_or(false, |f| !f.read_only))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

impl Record {
    /// Unvalidated record; undeclared and read-only keys are dropped.
    pub fn new(schema: Arc<Schema>, input: &Map<String, Value>) -> Self {
        let data = writable(&schema, input);
        Self {
            schema,
            data,
            errors: HashMap::new(),
            validated: false,
        }
    }

    /// Auto-validated record for data read back from storage.
    ///
    /// Skips the validation engine. Only for rows written through the same
    /// schema; never for external input.
    pub fn from_trusted(schema: Arc<Schema>, data: &Map<String, Value>) -> Self {
        let data = whitelist(&schema, data);
        Self {
            schema,
            data,
            errors: HashMap::new(),
            validated: true,
        }
    }

    /// Runs the engine with default options
    pub fn validate(&self) -> Record {
        self.validate_with(&Validator::new())
    }

    pub fn validate_with(&self, validator: &Validator) -> Record {
        let outcome = validator.validate(&self.schema, &self.data);
        let errors = outcome
            .errors
            .into_iter()
            .map(|e| (e.field.clone(), e))
            .collect();
        Record {
            schema: Arc::clone(&self.schema),
            data: outcome.data,
            errors,
            validated: true,
        }
    }

    /// Shallow merge of `partial` over `data`, then full re-validation.
    ///
    /// Read-only fields keep their current value.
    pub fn update(&self, partial: &Map<String, Value>) -> Record {
        let mut data = self.data.clone();
        for (key, value) in writable(&self.schema, partial) {
            data.insert(key, value);
        }
        Record {
            schema: Arc::clone(&self.schema),
            data,
            errors: HashMap::new(),
            validated: false,
        }
        .validate()
    }

    /// Validated and error-free
    pub fn is_valid(&self) -> bool {
        self.validated && self.errors.is_empty()
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Error message for `field`
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|e| e.message.as_str())
    }

    pub fn error_code(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|e| e.code.as_str())
    }

    /// Errors in schema declaration order
    pub fn error_list(&self) -> Vec<&ValidationError> {
        self.schema
            .fields()
            .iter()
            .filter_map(|f| self.errors.get(&f.name))
            .collect()
    }

    pub fn errors(&self) -> &HashMap<String, ValidationError> {
        &self.errors
    }

    /// Adds or replaces a `CUSTOM` error on `field`.
    ///
    /// # Errors
    ///
    /// Returns an undefined-class error if the schema has no such field.
    pub fn with_error(&self, field: &str, message: impl Into<String>) -> Result<Record, UnifiedError> {
        self.with_error_code(field, ValidationCode::Custom, message)
    }

    /// Adds or replaces an error with a caller-chosen code. `validated` is kept.
    pub fn with_error_code(
        &self,
        field: &str,
        code: impl Into<ValidationCode>,
        message: impl Into<String>,
    ) -> Result<Record, UnifiedError> {
        if !self.schema.has_field(field) {
            return Err(UnifiedError::undefined(format!(
                "Schema '{}' has no field '{}'",
                self.schema.name(),
                field
            )));
        }
        let mut next = self.clone();
        next.errors
            .insert(field.to_string(), ValidationError::new(field, code, message));
        Ok(next)
    }

    /// Re-attaches the `fields` array of a validation payload.
    ///
    /// Entries naming unknown fields, or lacking `field`/`message`, are
    /// skipped. A missing `code` becomes `CUSTOM`.
    pub fn with_error_payload(&self, payload: &ErrorPayload) -> Record {
        let mut next = self.clone();
        for entry in payload.fields().into_iter().flatten() {
            let field = entry.get("field").and_then(Value::as_str);
            let message = entry.get("message").and_then(Value::as_str);
            let (Some(field), Some(message)) = (field, message) else {
                continue;
            };
            if !self.schema.has_field(field) {
                continue;
            }
            let code = entry
                .get("code")
                .and_then(Value::as_str)
                .map_or(ValidationCode::Custom, ValidationCode::from);
            next.errors
                .insert(field.to_string(), ValidationError::new(field, code, message));
        }
        next
    }

    /// Escalates a validated, invalid record to a `VALIDATION` error.
    ///
    /// Unvalidated and valid records pass through unchanged.
    pub fn fail_if_invalid(&self) -> Result<&Self, UnifiedError> {
        if !self.validated || self.errors.is_empty() {
            return Ok(self);
        }

        let count = self.errors.len().to_string();
        log_event_with_fields(
            Event::RecordRejected,
            &[("schema", self.schema.name()), ("errors", &count)],
        );

        let fields = self.error_list().iter().map(|e| e.to_json()).collect();
        Err(UnifiedError::validation_failed(fields))
    }

    /// Insert path: validate, then refuse invalid data
    pub fn prepare_insert(&self) -> Result<Record, UnifiedError> {
        let validated = self.validate();
        validated.fail_if_invalid()?;
        Ok(validated)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    /// Field names from the schema, populated or not
    pub fn keys(&self) -> Vec<&str> {
        self.schema.field_names()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn title(&self, field: &str) -> String {
        self.schema.title(field)
    }

    pub fn placeholder(&self, field: &str) -> Option<&Value> {
        self.schema.placeholder(field)
    }

    pub fn meta(&self, field: &str, key: &str) -> Option<&Value> {
        self.schema.meta(field, key)
    }

    pub fn enum_values(&self, field: &str) -> &[String] {
        self.schema.enum_values(field)
    }

    /// Tagged projection: `{"schema", "data", "errors"?}`
    pub fn to_tagged_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("schema".to_string(), Value::String(self.schema.name().to_string()));
        out.insert("data".to_string(), Value::Object(self.data.clone()));
        if !self.errors.is_empty() {
            let errors: Map<String, Value> = self
                .error_list()
                .into_iter()
                .map(|e| {
                    let mut entry = Map::new();
                    entry.insert("code".to_string(), Value::String(e.code.as_str().to_string()));
                    entry.insert("message".to_string(), Value::String(e.message.clone()));
                    (e.field.clone(), Value::Object(entry))
                })
                .collect();
            out.insert("errors".to_string(), Value::Object(errors));
        }
        Value::Object(out)
    }
}

/// Serializes `data` only
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

/// Same schema instance, same data, same errors, same validation state
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
            && self.validated == other.validated
            && self.data == other.data
            && self.errors == other.errors
    }
}

impl Schema {
    /// `SchemaName(input)`: an unvalidated record bound to this schema
    pub fn record(self: &Arc<Self>, input: &Map<String, Value>) -> Record {
        Record::new(Arc::clone(self), input)
    }
}
