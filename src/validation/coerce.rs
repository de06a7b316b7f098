//! Representation changes applied before type checking.
//!
//! Coercion never fails: a value that cannot be converted is returned
//! unchanged and left for the type check to reject.

use serde_json::{Number, Value};

use crate::schema::FieldType;

/// Returns the coerced value, or `None` when no conversion applies.
pub fn coerce(field_type: &FieldType, value: &Value) -> Option<Value> {
    match field_type {
        FieldType::Integer | FieldType::Money => to_integer(value),
        FieldType::Number => to_number(value),
        FieldType::Boolean => to_boolean(value),
        FieldType::String | FieldType::Enum => to_text(value),
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(integral),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Some(Value::from(i)),
                Err(_) => s.parse::<f64>().ok().and_then(integral),
            }
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<Value> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

fn to_number(value: &Value) -> Option<Value> {
    let s = value.as_str()?.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn to_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        _ => None,
    }
}

fn to_text(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}
