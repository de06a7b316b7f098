//! Per-value rules: type, format, bounds, enum.
//!
//! Evaluated in that order for a present, non-null value; the first
//! failing rule produces the field's only error.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

use super::errors::{ValidationCode, ValidationError};
use super::messages;
use crate::schema::{FieldType, Format, SchemaField};

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static URL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static PHONE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static SLUG_RE: OnceLock<Option<Regex>> = OnceLock::new();
static UUID_RE: OnceLock<Option<Regex>> = OnceLock::new();
static ULID_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

impl Format {
    /// Whether `value` is well-formed for this format
    pub fn matches(&self, value: &str) -> bool {
        let re = match self {
            Format::Email => compiled(
                &EMAIL_RE,
                r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$",
            ),
            Format::Url => compiled(&URL_RE, r"^https?://[^\s/$.?#].[^\s]*$"),
            Format::Phone => compiled(&PHONE_RE, r"^[\d\s+\-().]+$"),
            Format::Slug => compiled(&SLUG_RE, r"^[a-z0-9]+(?:-[a-z0-9]+)*$"),
            Format::Uuid => compiled(
                &UUID_RE,
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
            ),
            // Crockford base32, 128 bits: the first char encodes at most 3 bits
            Format::Ulid => compiled(&ULID_RE, r"^[0-7][0-9A-HJKMNP-TV-Za-hjkmnp-tv-z]{25}$"),
        };
        re.map_or(false, |re| re.is_match(value))
    }
}

fn is_valid_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_valid_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

/// Structural type check; temporal strings are parsed in the format step.
fn has_type(field_type: &FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String | FieldType::Enum | FieldType::Date | FieldType::DateTime => {
            value.is_string()
        }
        FieldType::Integer | FieldType::Money => value.as_i64().is_some(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Json => true,
        FieldType::Array { items } => value
            .as_array()
            .map_or(false, |elems| elems.iter().all(|e| has_type(items, e))),
        FieldType::Object { .. } => value.is_object(),
    }
}

fn check_format(field: &SchemaField, title: &str, s: &str) -> Option<ValidationError> {
    if s.is_empty() {
        return None;
    }

    let failure = match &field.field_type {
        FieldType::Date if !is_valid_date(s) => Some(messages::format(title, "date")),
        FieldType::DateTime if !is_valid_datetime(s) => Some(messages::format(title, "datetime")),
        _ => match field.format {
            Some(format) if !format.matches(s) => Some(messages::format(title, format.label())),
            _ => None,
        },
    };
    if let Some(message) = failure {
        return Some(ValidationError::new(&field.name, ValidationCode::Format, message));
    }

    match &field.pattern {
        Some(re) if !re.is_match(s) => Some(ValidationError::new(
            &field.name,
            ValidationCode::Format,
            messages::pattern(title),
        )),
        _ => None,
    }
}

fn check_bounds(field: &SchemaField, title: &str, value: &Value) -> Option<ValidationError> {
    let name = &field.name;

    if let Some(s) = value.as_str() {
        let length = s.chars().count() as i64;
        if let Some(min) = field.min.filter(|&min| length < min) {
            return Some(ValidationError::new(
                name,
                ValidationCode::MinLength,
                messages::min_length(title, min),
            ));
        }
        if let Some(max) = field.max.filter(|&max| length > max) {
            return Some(ValidationError::new(
                name,
                ValidationCode::MaxLength,
                messages::max_length(title, max),
            ));
        }
        return None;
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = field.min.filter(|&min| below(value, n, min)) {
            return Some(ValidationError::new(
                name,
                ValidationCode::MinValue,
                messages::min_value(title, min),
            ));
        }
        if let Some(max) = field.max.filter(|&max| above(value, n, max)) {
            return Some(ValidationError::new(
                name,
                ValidationCode::MaxValue,
                messages::max_value(title, max),
            ));
        }
    }
    None
}

fn below(value: &Value, n: f64, min: i64) -> bool {
    match value.as_i64() {
        Some(i) => i < min,
        None => n < min as f64,
    }
}

fn above(value: &Value, n: f64, max: i64) -> bool {
    match value.as_i64() {
        Some(i) => i > max,
        None => n > max as f64,
    }
}

fn check_enum(field: &SchemaField, title: &str, value: &Value) -> Option<ValidationError> {
    if field.enum_values.is_empty() {
        return None;
    }
    let allowed = value
        .as_str()
        .map_or(false, |s| field.enum_values.iter().any(|v| v == s));
    if allowed {
        None
    } else {
        Some(ValidationError::new(
            &field.name,
            ValidationCode::Enum,
            messages::enumeration(title, &field.enum_values),
        ))
    }
}

/// Runs type → format → min → max → enum on a present, non-null value.
///
/// Returns the first failure. Messages use the field's own title.
pub fn check_present_value(field: &SchemaField, value: &Value) -> Option<ValidationError> {
    let title = field.title();

    if !has_type(&field.field_type, value) {
        return Some(ValidationError::new(
            &field.name,
            ValidationCode::Type,
            messages::type_mismatch(&title, field.field_type.type_name()),
        ));
    }

    if let Some(s) = value.as_str() {
        if let Some(err) = check_format(field, &title, s) {
            return Some(err);
        }
    }

    if field.field_type.is_string_like() || field.field_type.is_numeric() {
        if let Some(err) = check_bounds(field, &title, value) {
            return Some(err);
        }
    }

    check_enum(field, &title, value)
}
