//! The `{result, error}` propagation contract.
//!
//! Every failable call site returns `Result<T, UnifiedError>`. Callers that
//! want to branch instead of propagate wrap the call with [`attempt`] and
//! read a plain payload, whatever raised the failure.

use serde::Serialize;
use serde_json::Value;

use super::payload::ErrorPayload;
use super::unified::UnifiedError;
use crate::observability::{log_event_with_fields, Event};

/// Outcome of an attempted operation: exactly one side is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub result: Option<T>,
    pub error: Option<ErrorPayload>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            result: Some(value),
            error: None,
        }
    }

    pub fn failed(error: ErrorPayload) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Option<T>, ErrorPayload> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result),
        }
    }
}

/// Runs `op` and converts catchable failures into `{result: None, error}`.
///
/// # Errors
///
/// Developer errors (type, arity, undefined, state classes) are not
/// captured and propagate unchanged.
pub fn attempt<T, F>(op: F) -> Result<Outcome<T>, UnifiedError>
where
    F: FnOnce() -> Result<T, UnifiedError>,
{
    match op() {
        Ok(value) => Ok(Outcome::ok(value)),
        Err(err) if err.is_catchable() => {
            log_event_with_fields(
                Event::ErrorRaised,
                &[("class", err.class().as_str()), ("code", err.code())],
            );
            Ok(Outcome::failed(err.to_payload()))
        }
        Err(err) => Err(err),
    }
}

/// `fail(message)`: user failure with payload `{message}` and code `USER-0001`
pub fn fail(message: impl Into<String>) -> UnifiedError {
    UnifiedError::from_payload(ErrorPayload::from_message(message))
}

/// `fail(value)` for any argument.
///
/// Strings behave like [`fail`]. Objects need a string `message`; a string
/// `code` sets the error code and every other key passes through. Anything
/// else yields a non-catchable `TYPE-0005` error instead.
pub fn fail_with(value: Value) -> UnifiedError {
    match value {
        Value::String(message) => fail(message),
        Value::Object(map) => {
            if !matches!(map.get("message"), Some(Value::String(_))) {
                return UnifiedError::type_error(
                    "fail() payload must contain a string 'message' key",
                );
            }
            if matches!(map.get("code"), Some(code) if !code.is_string()) {
                return UnifiedError::type_error("fail() payload 'code' must be a string");
            }
            UnifiedError::from_payload(ErrorPayload::new(map))
        }
        other => UnifiedError::type_error(format!(
            "fail() expects a string or a dictionary, got {}",
            kind_of(&other)
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "dictionary",
    }
}

/// String rendering used in concatenation.
///
/// Any object with a string `message` renders as that message, so
/// `"Error: " + error` reads the same for every error origin.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use serde_json::json;

    #[test]
    fn test_fail_message() {
        let err = fail("Out of stock");
        assert_eq!(err.code(), "USER-0001");
        assert_eq!(err.message(), "Out of stock");
        assert_eq!(err.payload().unwrap().to_json(), json!({"message": "Out of stock"}));
    }

    #[test]
    fn test_fail_with_object_passes_keys_through() {
        let err = fail_with(json!({"message": "Nope", "code": "NOPE", "retry": true}));
        assert_eq!(err.code(), "NOPE");
        assert_eq!(err.payload().unwrap().get("retry"), Some(&json!(true)));
    }

    #[test]
    fn test_fail_with_bad_arguments_is_type_error() {
        for bad in [json!({"code": "X"}), json!({"message": 5}), json!(123), json!(null)] {
            let err = fail_with(bad);
            assert_eq!(err.class(), ErrorClass::Type);
            assert_eq!(err.code(), "TYPE-0005");
        }
        assert_eq!(fail_with(json!({"message": "m", "code": 7})).code(), "TYPE-0005");
    }

    #[test]
    fn test_attempt_success() {
        let outcome = attempt(|| Ok::<_, UnifiedError>(42)).unwrap();
        assert_eq!(outcome, Outcome::ok(42));
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_attempt_captures_user_failures() {
        let outcome = attempt(|| -> Result<(), UnifiedError> { Err(fail("Out of stock")) }).unwrap();
        let error = outcome.error.unwrap();
        assert_eq!(error.message(), "Out of stock");
        assert_eq!(error.code(), Some("USER-0001"));
    }

    #[test]
    fn test_attempt_propagates_developer_errors() {
        let result = attempt(|| -> Result<(), UnifiedError> { Err(fail_with(json!(1))) });
        assert_eq!(result.unwrap_err().code(), "TYPE-0005");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!({"message": "Bad input", "code": "X"})), "Bad input");
        assert_eq!(display_value(&json!("plain")), "plain");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!({"a": 1})), "{\"a\":1}");
    }
}
