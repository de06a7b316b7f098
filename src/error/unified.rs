//! The unified error: the only error shape that crosses the
//! `{result, error}` boundary.

use std::fmt;
use std::io;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::codes;
use super::payload::ErrorPayload;
use crate::schema::{SchemaError, SchemaErrorCode};

/// Error category. Decides whether `attempt` captures the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// User-raised failures and validation
    Value,
    /// Wrong kind of argument
    Type,
    /// Wrong number of arguments
    Arity,
    /// Reference to something undeclared
    Undefined,
    /// Operation invalid in the current state
    State,
    Io,
    Network,
    Database,
    Format,
    Security,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Value => "value",
            ErrorClass::Type => "type",
            ErrorClass::Arity => "arity",
            ErrorClass::Undefined => "undefined",
            ErrorClass::State => "state",
            ErrorClass::Io => "io",
            ErrorClass::Network => "network",
            ErrorClass::Database => "database",
            ErrorClass::Format => "format",
            ErrorClass::Security => "security",
        }
    }

    /// Runtime failures are catchable; developer errors always propagate.
    pub fn is_catchable(&self) -> bool {
        matches!(
            self,
            ErrorClass::Value
                | ErrorClass::Io
                | ErrorClass::Network
                | ErrorClass::Database
                | ErrorClass::Format
                | ErrorClass::Security
        )
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP projection of an error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: Value,
}

/// A failure with a machine code, a human message and, for user-visible
/// failures, a structured payload whose `message` equals `message`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct UnifiedError {
    class: ErrorClass,
    code: String,
    message: String,
    payload: Option<ErrorPayload>,
}

impl UnifiedError {
    /// System fault without a payload
    pub fn system(class: ErrorClass, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class,
            code: code.into(),
            message: message.into(),
            payload: None,
        }
    }

    /// Unclassified host fault; catchable like an I/O fault
    pub fn internal(message: impl Into<String>) -> Self {
        Self::system(ErrorClass::Io, codes::INTERNAL, message)
    }

    /// Malformed argument to `fail`
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::system(ErrorClass::Type, codes::TYPE_FAIL_ARGUMENT, message)
    }

    /// Reference to an undeclared name
    pub fn undefined(message: impl Into<String>) -> Self {
        Self::system(ErrorClass::Undefined, codes::UNDEFINED, message)
    }

    /// User-visible failure built from a payload that already holds a
    /// string `message`. The payload `code` wins over `USER-0001`.
    pub(crate) fn from_payload(payload: ErrorPayload) -> Self {
        Self {
            class: ErrorClass::Value,
            code: payload.code().unwrap_or(codes::USER).to_string(),
            message: payload.message().to_string(),
            payload: Some(payload),
        }
    }

    /// Validation escalation carrying the record's error list
    pub fn validation_failed(fields: Vec<Value>) -> Self {
        let mut map = Map::new();
        map.insert("status".to_string(), Value::from(codes::VALIDATION_HTTP_STATUS));
        map.insert("code".to_string(), Value::String(codes::VALIDATION.to_string()));
        map.insert("message".to_string(), Value::String("Validation failed".to_string()));
        map.insert("fields".to_string(), Value::Array(fields));
        Self::from_payload(ErrorPayload::new(map))
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The payload as raised; `None` for system faults
    pub fn payload(&self) -> Option<&ErrorPayload> {
        self.payload.as_ref()
    }

    pub fn is_catchable(&self) -> bool {
        self.class.is_catchable()
    }

    /// Payload seen by `{result, error}` callers.
    ///
    /// Always holds `message` and `code`; system faults get a synthesized
    /// `{message, code}`.
    pub fn to_payload(&self) -> ErrorPayload {
        let mut payload = match &self.payload {
            Some(p) => p.clone(),
            None => ErrorPayload::from_message(self.message.clone()),
        };
        if !payload.contains_key("code") {
            payload.insert("code", Value::String(self.code.clone()));
        }
        payload
    }

    /// Payload `status`, or 500
    pub fn http_status(&self) -> u16 {
        self.payload
            .as_ref()
            .and_then(ErrorPayload::status)
            .unwrap_or(codes::DEFAULT_HTTP_STATUS)
    }

    /// HTTP projection: payload `status` (or 500) and an `{"error": payload}`
    /// body. The payload is written unchanged, `status` included.
    pub fn to_response(&self) -> ErrorResponse {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::Object(self.to_payload().into_map()));
        ErrorResponse {
            status: self.http_status(),
            body: Value::Object(body),
        }
    }
}

impl From<io::Error> for UnifiedError {
    fn from(err: io::Error) -> Self {
        Self::system(ErrorClass::Io, codes::IO, err.to_string())
    }
}

impl From<SchemaError> for UnifiedError {
    fn from(err: SchemaError) -> Self {
        let class = match err.code() {
            SchemaErrorCode::UnknownSchema => ErrorClass::Undefined,
            SchemaErrorCode::MalformedSchema => ErrorClass::Format,
            _ => ErrorClass::State,
        };
        Self::system(class, err.code().code(), err.message())
    }
}
