//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - integer: 64-bit signed integer
//! - number: 64-bit floating point (integers accepted)
//! - boolean: Boolean
//! - enum: string restricted to a fixed set of values
//! - date / datetime: ISO 8601 strings
//! - money: integer amount in minor units (cents)
//! - json: any value, unchecked
//! - array: homogeneous array with element type
//! - object: nested mapping, optionally naming another schema

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::title::to_title_case;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Number,
    /// Boolean
    Boolean,
    /// String restricted to `enum_values`
    Enum,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// Timestamp, RFC 3339
    #[serde(rename = "datetime")]
    DateTime,
    /// Integer amount in minor units
    Money,
    /// Any JSON value
    Json,
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        items: Box<FieldType>,
    },
    /// Nested object, optionally bound to a named schema
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<String>,
    },
}

impl FieldType {
    /// Returns the type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Enum => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Money => "integer",
            FieldType::Json => "json",
            FieldType::Array { .. } => "list",
            FieldType::Object { .. } => "object",
        }
    }

    /// String-like types accept formats, patterns and length bounds.
    pub fn is_string_like(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Enum)
    }

    /// Numeric types accept value bounds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Number | FieldType::Money)
    }

    /// Temporal types accept the `now` default.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Array { items } => write!(f, "[{}]", items),
            FieldType::Object { schema: Some(name) } => write!(f, "{}", name),
            FieldType::DateTime => write!(f, "datetime"),
            FieldType::Money => write!(f, "money"),
            FieldType::Enum => write!(f, "enum"),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// Recognized string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Email,
    Url,
    Phone,
    Slug,
    Uuid,
    Ulid,
}

impl Format {
    /// Human label used in FORMAT messages
    pub fn label(&self) -> &'static str {
        match self {
            Format::Email => "email address",
            Format::Url => "URL",
            Format::Phone => "phone number",
            Format::Slug => "slug",
            Format::Uuid => "UUID",
            Format::Ulid => "ULID",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Url => "url",
            Format::Phone => "phone",
            Format::Slug => "slug",
            Format::Uuid => "uuid",
            Format::Ulid => "ulid",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value substituted for an absent field during validation
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Fixed value, copied as-is
    Literal(Value),
    /// Current date or timestamp, computed at validation time
    Now,
}

/// A compiled, immutable field of a [`Schema`].
///
/// Built by [`Schema::define`](super::Schema::define) from a
/// [`FieldSpec`](super::FieldSpec); never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub nullable: bool,
    /// Minimum length (string-like) or value (numeric)
    pub min: Option<i64>,
    /// Maximum length (string-like) or value (numeric)
    pub max: Option<i64>,
    pub format: Option<Format>,
    pub pattern: Option<Regex>,
    pub enum_values: Vec<String>,
    pub default: Option<DefaultValue>,
    /// Generated by the server or database
    pub auto: bool,
    pub read_only: bool,
    pub unique: bool,
    /// UI hints; never consulted by validation
    pub metadata: Map<String, Value>,
}

impl SchemaField {
    /// Display title: `metadata.title` or the title-cased name
    pub fn title(&self) -> String {
        match self.metadata.get("title") {
            Some(Value::String(title)) => title.clone(),
            _ => to_title_case(&self.name),
        }
    }

    /// Whether an explicit null is acceptable
    pub fn accepts_null(&self) -> bool {
        self.nullable
    }

    /// Whether the field is hidden from form iteration
    pub fn is_hidden(&self) -> bool {
        matches!(self.metadata.get("hidden"), Some(Value::Bool(true)))
    }

    /// A field named `id` is the table's primary key
    pub fn is_primary_key(&self) -> bool {
        self.name == "id"
    }

    /// Field descriptor for forms and tooling:
    /// `{name, type, required, nullable, auto, readOnly[, default]}`
    pub fn describe(&self) -> Value {
        let mut out = Map::new();
        out.insert("name".to_string(), Value::String(self.name.clone()));
        out.insert("type".to_string(), Value::String(self.field_type.to_string()));
        out.insert("required".to_string(), Value::Bool(self.required));
        out.insert("nullable".to_string(), Value::Bool(self.nullable));
        out.insert("auto".to_string(), Value::Bool(self.auto));
        out.insert("readOnly".to_string(), Value::Bool(self.read_only));
        match &self.default {
            Some(DefaultValue::Literal(value)) => {
                out.insert("default".to_string(), value.clone());
            }
            Some(DefaultValue::Now) => {
                out.insert("default".to_string(), Value::String("now".to_string()));
            }
            None => {}
        }
        Value::Object(out)
    }
}

/// Complete schema definition: an ordered, named set of fields.
///
/// Field order is declaration order. It drives column order and
/// `keys()`, never which validation errors fire.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(super) name: String,
    pub(super) fields: Vec<SchemaField>,
    pub(super) index: HashMap<String, usize>,
}

impl Schema {
    /// Schema identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Whether the schema declares `name`
    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fields shown by form iteration: not auto-generated, not hidden
    pub fn visible_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.auto && !f.is_hidden())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Name of the primary key field, if the schema declares one
    pub fn primary_key(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.is_primary_key())
            .map(|f| f.name.as_str())
    }

    /// Field descriptors keyed by name, in declaration order
    pub fn describe_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.describe()))
            .collect()
    }

    /// Display title for a field.
    ///
    /// Unknown fields fall back to title casing the given name.
    pub fn title(&self, field: &str) -> String {
        match self.field(field) {
            Some(f) => f.title(),
            None => to_title_case(field),
        }
    }

    /// Arbitrary metadata lookup
    pub fn meta(&self, field: &str, key: &str) -> Option<&Value> {
        self.field(field).and_then(|f| f.metadata.get(key))
    }

    /// `metadata.placeholder`, if any
    pub fn placeholder(&self, field: &str) -> Option<&Value> {
        self.meta(field, "placeholder")
    }

    /// Allowed values for a field; empty when unconstrained
    pub fn enum_values(&self, field: &str) -> &[String] {
        self.field(field)
            .map(|f| f.enum_values.as_slice())
            .unwrap_or(&[])
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.field_type))
            .collect();
        write!(f, "@schema {} {{ {} }}", self.name, fields.join(", "))
    }
}
