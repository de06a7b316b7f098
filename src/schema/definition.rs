//! Schema declaration: field specs and the `define` entry point.
//!
//! A [`FieldSpec`] is the raw, serializable declaration of a field. It is
//! checked and compiled into a [`SchemaField`] exactly once, when the schema
//! is defined. Broken declarations are DefinitionErrors and never reach the
//! validation engine.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{DefaultValue, FieldType, Format, Schema, SchemaField};
use crate::observability::{log_event_with_fields, Event};
use crate::validation::check_present_value;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Declaration of one schema field.
///
/// Deserializes from the JSON form used by schema documents:
///
/// ```json
/// {"name": "email", "type": "string", "format": "email", "required": true,
///  "max": 120, "meta": {"title": "E-mail"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Default to the current date/timestamp at validation time
    #[serde(default, skip_serializing_if = "is_false")]
    pub default_now: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            nullable: false,
            min: None,
            max: None,
            format: None,
            pattern: None,
            enum_values: Vec::new(),
            default: None,
            default_now: false,
            auto: false,
            read_only: false,
            unique: false,
            meta: Map::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    pub fn money(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Money)
    }

    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Json)
    }

    /// Enum field with its allowed values
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldType::Enum).enum_values(values)
    }

    pub fn array(name: impl Into<String>, items: FieldType) -> Self {
        Self::new(
            name,
            FieldType::Array {
                items: Box::new(items),
            },
        )
    }

    /// Nested object, optionally referencing another schema by name
    pub fn object(name: impl Into<String>, schema: Option<&str>) -> Self {
        Self::new(
            name,
            FieldType::Object {
                schema: schema.map(str::to_string),
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default_now = true;
        self
    }

    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.meta("title", Value::String(title.into()))
    }

    pub fn placeholder(self, placeholder: impl Into<String>) -> Self {
        self.meta("placeholder", Value::String(placeholder.into()))
    }

    /// Checks the declaration and compiles it into a field.
    fn compile(self, schema: &str) -> SchemaResult<SchemaField> {
        let name = self.name.as_str();
        let ty = &self.field_type;

        if self.required && self.nullable {
            return Err(SchemaError::conflicting_flags(
                schema,
                name,
                "required and nullable cannot be combined",
            ));
        }
        if self.auto && self.required {
            return Err(SchemaError::conflicting_flags(
                schema,
                name,
                "auto and required cannot be combined",
            ));
        }

        if self.format.is_some() && !ty.is_string_like() {
            return Err(SchemaError::incompatible_constraint(schema, name, "format", ty));
        }

        let pattern = match &self.pattern {
            Some(_) if !ty.is_string_like() => {
                return Err(SchemaError::incompatible_constraint(schema, name, "pattern", ty));
            }
            Some(source) => Some(
                Regex::new(source).map_err(|e| SchemaError::invalid_pattern(schema, name, e))?,
            ),
            None => None,
        };

        let bounded = ty.is_string_like() || ty.is_numeric();
        if self.min.is_some() && !bounded {
            return Err(SchemaError::incompatible_constraint(schema, name, "min", ty));
        }
        if self.max.is_some() && !bounded {
            return Err(SchemaError::incompatible_constraint(schema, name, "max", ty));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SchemaError::conflicting_flags(
                    schema,
                    name,
                    format!("min {} exceeds max {}", min, max),
                ));
            }
        }

        if names_empty_schema(ty) {
            return Err(SchemaError::empty_schema_reference(schema, name));
        }

        match ty {
            FieldType::Enum if self.enum_values.is_empty() => {
                return Err(SchemaError::empty_enum(schema, name));
            }
            FieldType::Enum | FieldType::String => {}
            _ if !self.enum_values.is_empty() => {
                return Err(SchemaError::incompatible_constraint(schema, name, "enum", ty));
            }
            _ => {}
        }

        let default = match (self.default.clone(), self.default_now) {
            (Some(_), true) => {
                return Err(SchemaError::invalid_default(
                    schema,
                    name,
                    "a literal default and a 'now' default are exclusive",
                ));
            }
            (None, true) if !ty.is_temporal() => {
                return Err(SchemaError::incompatible_constraint(
                    schema,
                    name,
                    "default now",
                    ty,
                ));
            }
            (None, true) => Some(DefaultValue::Now),
            (Some(value), false) => Some(DefaultValue::Literal(value)),
            (None, false) => None,
        };

        let field = SchemaField {
            name: self.name,
            field_type: self.field_type,
            required: self.required,
            nullable: self.nullable,
            min: self.min,
            max: self.max,
            format: self.format,
            pattern,
            enum_values: self.enum_values,
            default,
            auto: self.auto,
            read_only: self.read_only,
            unique: self.unique,
            metadata: self.meta,
        };

        if let Some(DefaultValue::Literal(value)) = &field.default {
            check_default(schema, &field, value)?;
        }

        Ok(field)
    }
}

/// Object references, including array items, need a non-blank schema name.
fn names_empty_schema(ty: &FieldType) -> bool {
    match ty {
        FieldType::Object { schema: Some(target) } => target.trim().is_empty(),
        FieldType::Array { items } => names_empty_schema(items),
        _ => false,
    }
}

/// A literal default must itself pass the field's rules.
fn check_default(schema: &str, field: &SchemaField, value: &Value) -> SchemaResult<()> {
    if value.is_null() {
        if field.nullable {
            return Ok(());
        }
        return Err(SchemaError::invalid_default(
            schema,
            &field.name,
            "null default on a non-nullable field",
        ));
    }

    match check_present_value(field, value) {
        Some(err) => Err(SchemaError::invalid_default(schema, &field.name, err.message)),
        None => Ok(()),
    }
}

/// Serializable schema document: `{"name": ..., "fields": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl SchemaDefinition {
    /// Compiles the document into a schema
    pub fn into_schema(self) -> SchemaResult<Schema> {
        Schema::define(self.name, self.fields)
    }
}

impl Schema {
    /// Builds a schema from an ordered list of field declarations.
    ///
    /// # Errors
    ///
    /// Returns a fatal `SchemaError` if:
    /// - a field name repeats (SCHEMA-0001)
    /// - a pattern does not compile (SCHEMA-0002)
    /// - a constraint is incompatible with the field type (SCHEMA-0003)
    /// - an enum field has no allowed values (SCHEMA-0004)
    /// - a literal default breaks the field's rules (SCHEMA-0005)
    /// - flags conflict: auto+required, required+nullable, min > max (SCHEMA-0006)
    pub fn define(name: impl Into<String>, specs: Vec<FieldSpec>) -> SchemaResult<Schema> {
        let name = name.into();
        let mut fields = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());

        for spec in specs {
            if index.contains_key(&spec.name) {
                return Err(SchemaError::duplicate_field(&name, &spec.name));
            }
            let field = spec.compile(&name)?;
            index.insert(field.name.clone(), fields.len());
            fields.push(field);
        }

        let count = fields.len().to_string();
        log_event_with_fields(Event::SchemaDefined, &[("schema", &name), ("fields", &count)]);

        Ok(Schema {
            name,
            fields,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;

    fn define_one(spec: FieldSpec) -> SchemaResult<Schema> {
        Schema::define("Test", vec![spec])
    }

    #[test]
    fn test_define_preserves_order() {
        let schema = Schema::define(
            "User",
            vec![
                FieldSpec::string("name").required(),
                FieldSpec::integer("age").min(0),
                FieldSpec::string("email").format(Format::Email),
            ],
        )
        .unwrap();
        assert_eq!(schema.name(), "User");
        assert_eq!(schema.field_names(), vec!["name", "age", "email"]);
        assert!(schema.field("name").unwrap().required);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Schema::define(
            "User",
            vec![FieldSpec::string("name"), FieldSpec::integer("name")],
        )
        .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateField);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_format_on_boolean_rejected() {
        let err = define_one(FieldSpec::boolean("active").format(Format::Email)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IncompatibleConstraint);
    }

    #[test]
    fn test_pattern_on_integer_rejected() {
        let err = define_one(FieldSpec::integer("n").pattern("^[0-9]+$")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IncompatibleConstraint);
    }

    #[test]
    fn test_bad_regex_rejected() {
        let err = define_one(FieldSpec::string("code").pattern("([a-z")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidPattern);
    }

    #[test]
    fn test_empty_enum_rejected() {
        let empty: Vec<String> = Vec::new();
        let err = define_one(FieldSpec::enumeration("status", empty)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::EmptyEnum);
    }

    #[test]
    fn test_enum_values_on_integer_rejected() {
        let err = define_one(FieldSpec::integer("n").enum_values(["1", "2"])).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IncompatibleConstraint);
    }

    #[test]
    fn test_blank_object_schema_name_rejected() {
        let err = define_one(FieldSpec::object("owner", Some(""))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IncompatibleConstraint);
        assert_eq!(err.field(), Some("owner"));

        let items = FieldType::Object {
            schema: Some("  ".to_string()),
        };
        assert!(define_one(FieldSpec::array("owners", items)).is_err());

        let def: SchemaDefinition = serde_json::from_value(json!({
            "name": "Order",
            "fields": [{"name": "buyer", "type": "object", "schema": ""}]
        }))
        .unwrap();
        assert!(def.into_schema().is_err());

        assert!(define_one(FieldSpec::object("extra", None)).is_ok());
        assert!(define_one(FieldSpec::object("buyer", Some("User"))).is_ok());
    }

    #[test]
    fn test_min_on_boolean_rejected() {
        let err = define_one(FieldSpec::boolean("flag").min(1)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IncompatibleConstraint);
    }

    #[test]
    fn test_min_greater_than_max_rejected() {
        let err = define_one(FieldSpec::integer("n").min(10).max(1)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ConflictingFlags);
    }

    #[test]
    fn test_auto_and_required_rejected() {
        let err = define_one(FieldSpec::integer("id").auto().required()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ConflictingFlags);
    }

    #[test]
    fn test_required_and_nullable_rejected() {
        let err = define_one(FieldSpec::string("bio").required().nullable()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ConflictingFlags);
    }

    #[test]
    fn test_default_must_match_enum() {
        let err = define_one(
            FieldSpec::enumeration("status", ["open", "closed"]).default_value("pending"),
        )
        .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefault);

        assert!(define_one(
            FieldSpec::enumeration("status", ["open", "closed"]).default_value("open")
        )
        .is_ok());
    }

    #[test]
    fn test_default_now_only_on_temporal_fields() {
        assert!(define_one(FieldSpec::datetime("createdAt").default_now()).is_ok());
        let err = define_one(FieldSpec::string("name").default_now()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IncompatibleConstraint);
    }

    #[test]
    fn test_null_default_requires_nullable() {
        assert!(define_one(FieldSpec::string("bio").nullable().default_value(Value::Null)).is_ok());
        let err = define_one(FieldSpec::string("bio").default_value(Value::Null)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefault);
    }

    #[test]
    fn test_definition_from_json() {
        let def: SchemaDefinition = serde_json::from_value(json!({
            "name": "Task",
            "fields": [
                {"name": "title", "type": "string", "required": true, "max": 80},
                {"name": "status", "type": "enum", "enum": ["open", "closed"], "default": "open"},
                {"name": "tags", "type": "array", "items": {"type": "string"}},
                {"name": "createdAt", "type": "datetime", "default_now": true, "auto": true},
                {"name": "owner", "type": "string", "meta": {"title": "Owned By"}}
            ]
        }))
        .unwrap();

        let schema = def.into_schema().unwrap();
        assert_eq!(schema.field_names(), vec!["title", "status", "tags", "createdAt", "owner"]);
        assert_eq!(schema.field("title").unwrap().max, Some(80));
        assert_eq!(
            schema.field("status").unwrap().default,
            Some(DefaultValue::Literal(json!("open")))
        );
        assert_eq!(schema.field("createdAt").unwrap().default, Some(DefaultValue::Now));
        assert_eq!(schema.title("owner"), "Owned By");
    }
}
