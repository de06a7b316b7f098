//! Message templates, keyed by validation code.
//!
//! Placeholders: `{title}`, `{type}`, `{values}`, `{min}`, `{max}`.

use super::errors::ValidationCode;

const PATTERN_TEMPLATE: &str = "{title} does not match the required pattern";

/// Template for a code; caller-chosen codes have none.
pub fn template(code: &ValidationCode) -> Option<&'static str> {
    let template = match code {
        ValidationCode::Required => "{title} is required",
        ValidationCode::Type => "{title} must be a {type}",
        ValidationCode::Format => "{title} is not a valid {type}",
        ValidationCode::Enum => "{title} must be one of: {values}",
        ValidationCode::MinLength => "{title} must be at least {min} characters",
        ValidationCode::MaxLength => "{title} must be at most {max} characters",
        ValidationCode::MinValue => "{title} must be at least {min}",
        ValidationCode::MaxValue => "{title} must be at most {max}",
        ValidationCode::Custom | ValidationCode::Other(_) => return None,
    };
    Some(template)
}

/// Substitutes `{key}` placeholders.
pub fn render(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in params {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

fn with_code(code: ValidationCode, params: &[(&str, &str)]) -> String {
    match template(&code) {
        Some(t) => render(t, params),
        None => String::new(),
    }
}

pub fn required(title: &str) -> String {
    with_code(ValidationCode::Required, &[("title", title)])
}

pub fn type_mismatch(title: &str, type_name: &str) -> String {
    with_code(ValidationCode::Type, &[("title", title), ("type", type_name)])
}

pub fn format(title: &str, label: &str) -> String {
    with_code(ValidationCode::Format, &[("title", title), ("type", label)])
}

pub fn pattern(title: &str) -> String {
    render(PATTERN_TEMPLATE, &[("title", title)])
}

pub fn enumeration(title: &str, values: &[String]) -> String {
    let joined = values.join(", ");
    with_code(ValidationCode::Enum, &[("title", title), ("values", &joined)])
}

pub fn min_length(title: &str, min: i64) -> String {
    with_code(ValidationCode::MinLength, &[("title", title), ("min", &min.to_string())])
}

pub fn max_length(title: &str, max: i64) -> String {
    with_code(ValidationCode::MaxLength, &[("title", title), ("max", &max.to_string())])
}

pub fn min_value(title: &str, min: i64) -> String {
    with_code(ValidationCode::MinValue, &[("title", title), ("min", &min.to_string())])
}

pub fn max_value(title: &str, max: i64) -> String {
    with_code(ValidationCode::MaxValue, &[("title", title), ("max", &max.to_string())])
}
