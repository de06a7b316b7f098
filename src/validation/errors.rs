//! Field-level validation errors
//!
//! A `ValidationError` is data, not a raised error: it is collected into a
//! record's error map and only escalates through `Record::fail_if_invalid`.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// Validation failure codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    Required,
    Type,
    Format,
    Enum,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    /// Default code for errors attached with `with_error`
    Custom,
    /// Any other caller-chosen code
    Other(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            ValidationCode::Required => "REQUIRED",
            ValidationCode::Type => "TYPE",
            ValidationCode::Format => "FORMAT",
            ValidationCode::Enum => "ENUM",
            ValidationCode::MinLength => "MIN_LENGTH",
            ValidationCode::MaxLength => "MAX_LENGTH",
            ValidationCode::MinValue => "MIN_VALUE",
            ValidationCode::MaxValue => "MAX_VALUE",
            ValidationCode::Custom => "CUSTOM",
            ValidationCode::Other(code) => code,
        }
    }
}

impl From<&str> for ValidationCode {
    fn from(code: &str) -> Self {
        match code {
            "REQUIRED" => ValidationCode::Required,
            "TYPE" => ValidationCode::Type,
            "FORMAT" => ValidationCode::Format,
            "ENUM" => ValidationCode::Enum,
            "MIN_LENGTH" => ValidationCode::MinLength,
            "MAX_LENGTH" => ValidationCode::MaxLength,
            "MIN_VALUE" => ValidationCode::MinValue,
            "MAX_VALUE" => ValidationCode::MaxValue,
            "CUSTOM" => ValidationCode::Custom,
            other => ValidationCode::Other(other.to_string()),
        }
    }
}

impl From<String> for ValidationCode {
    fn from(code: String) -> Self {
        ValidationCode::from(code.as_str())
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ValidationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValidationCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Err(de::Error::custom("validation code cannot be empty"));
        }
        Ok(ValidationCode::from(raw))
    }
}

/// One field-level failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<ValidationCode>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// `{field, code, message}` entry used in validation payloads
    pub fn to_json(&self) -> Value {
        json!({
            "field": self.field,
            "code": self.code.as_str(),
            "message": self.message,
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip_through_str() {
        for code in [
            ValidationCode::Required,
            ValidationCode::Type,
            ValidationCode::Format,
            ValidationCode::Enum,
            ValidationCode::MinLength,
            ValidationCode::MaxLength,
            ValidationCode::MinValue,
            ValidationCode::MaxValue,
            ValidationCode::Custom,
        ] {
            assert_eq!(ValidationCode::from(code.as_str()), code);
        }
    }

    #[test]
    fn test_caller_codes_are_kept_verbatim() {
        let code = ValidationCode::from("TAKEN");
        assert_eq!(code, ValidationCode::Other("TAKEN".into()));
        assert_eq!(code.as_str(), "TAKEN");
    }

    #[test]
    fn test_error_json_shape() {
        let err = ValidationError::new("email", ValidationCode::Format, "Email is not a valid email address");
        assert_eq!(
            err.to_json(),
            json!({"field": "email", "code": "FORMAT", "message": "Email is not a valid email address"})
        );
        assert_eq!(serde_json::to_value(&err).unwrap(), err.to_json());
    }
}
