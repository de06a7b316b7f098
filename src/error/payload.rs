use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured error payload: the `error` half of `{result, error}`.
///
/// A plain JSON object, so callers read `message`, `code`, `status` and
/// any user keys the same way whatever raised the failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorPayload(Map<String, Value>);

impl ErrorPayload {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// `{message}`
    pub fn from_message(message: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(message.into()));
        Self(map)
    }

    /// The `message` key; empty when absent
    pub fn message(&self) -> &str {
        self.0.get("message").and_then(Value::as_str).unwrap_or("")
    }

    pub fn code(&self) -> Option<&str> {
        self.0.get("code").and_then(Value::as_str)
    }

    /// The `status` key, if it is a valid HTTP status
    pub fn status(&self) -> Option<u16> {
        self.0
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .filter(|s| (100..=599).contains(s))
    }

    /// The `fields` array of a validation payload
    pub fn fields(&self) -> Option<&Vec<Value>> {
        self.0.get("fields").and_then(Value::as_array)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// A payload coerces to its message in string context.
impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ErrorPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors() {
        let p = payload(json!({"message": "Out of stock", "code": "NO_STOCK", "status": 409, "sku": "A1"}));
        assert_eq!(p.message(), "Out of stock");
        assert_eq!(p.code(), Some("NO_STOCK"));
        assert_eq!(p.status(), Some(409));
        assert_eq!(p.get("sku"), Some(&json!("A1")));
        assert!(p.fields().is_none());
    }

    #[test]
    fn test_invalid_status_ignored() {
        assert_eq!(payload(json!({"message": "x", "status": 99999})).status(), None);
        assert_eq!(payload(json!({"message": "x", "status": "404"})).status(), None);
    }

    #[test]
    fn test_display_is_message() {
        let p = ErrorPayload::from_message("Email is required");
        assert_eq!(format!("Error: {}", p), "Error: Email is required");
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let p = payload(json!({"message": "m", "code": "C"}));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({"message": "m", "code": "C"}));
    }
}
