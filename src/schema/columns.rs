//! Schema-derived SQL column definitions.
//!
//! Consumed by table binding when emitting `CREATE TABLE`. Only column
//! shapes are produced here; query generation lives elsewhere.
//!
//! - `id` is the primary key; an auto `id` integer uses the dialect's
//!   auto-increment form and carries no other clauses
//! - enum values, value bounds and length bounds become one `CHECK(...)`

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{DefaultValue, FieldType, Schema, SchemaField};

/// Target database dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Sqlite,
    Postgres,
    Mysql,
}

impl SqlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::Postgres => "postgres",
            SqlDialect::Mysql => "mysql",
        }
    }

    /// SQL type for a field type
    pub fn sql_type(&self, field_type: &FieldType) -> &'static str {
        let sqlite = *self == SqlDialect::Sqlite;
        match field_type {
            FieldType::Integer | FieldType::Money => "INTEGER",
            FieldType::Number => "REAL",
            FieldType::Boolean if sqlite => "INTEGER",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Date if sqlite => "TEXT",
            FieldType::Date => "DATE",
            FieldType::DateTime if sqlite => "TEXT",
            FieldType::DateTime => "TIMESTAMP",
            FieldType::Json if *self == SqlDialect::Postgres => "JSONB",
            // arrays and nested objects are stored serialized
            _ => "TEXT",
        }
    }

    /// Auto-increment integer key type
    fn serial_type(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "INTEGER",
            SqlDialect::Postgres => "SERIAL",
            SqlDialect::Mysql => "INT AUTO_INCREMENT",
        }
    }

    fn bool_literal(&self, b: bool) -> &'static str {
        match (self, b) {
            (SqlDialect::Sqlite, true) => "1",
            (SqlDialect::Sqlite, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One column of a generated table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    /// Generated key; rendered as `name TYPE PRIMARY KEY` only
    pub auto_increment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expr: Option<String>,
    /// Conditions joined into a single `CHECK(...)`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<String>,
}

impl ColumnDef {
    fn from_field(field: &SchemaField, dialect: SqlDialect) -> Self {
        let primary_key = field.is_primary_key();
        if primary_key && field.auto {
            let sql_type = match field.field_type {
                FieldType::Integer => dialect.serial_type(),
                ref other => dialect.sql_type(other),
            };
            return Self {
                name: field.name.clone(),
                sql_type: sql_type.to_string(),
                nullable: false,
                unique: false,
                primary_key,
                auto_increment: true,
                default_expr: None,
                checks: Vec::new(),
            };
        }

        Self {
            name: field.name.clone(),
            sql_type: dialect.sql_type(&field.field_type).to_string(),
            nullable: field.nullable,
            unique: field.unique,
            primary_key,
            auto_increment: false,
            default_expr: field
                .default
                .as_ref()
                .map(|d| default_expr(d, &field.field_type, dialect)),
            checks: checks(field),
        }
    }

    /// `name TYPE [PRIMARY KEY] [NOT NULL] [UNIQUE] [DEFAULT expr] [CHECK(...)]`
    pub fn to_sql(&self) -> String {
        let mut parts = vec![self.name.clone(), self.sql_type.clone()];
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        if self.auto_increment {
            return parts.join(" ");
        }
        if !self.nullable {
            parts.push("NOT NULL".to_string());
        }
        if self.unique {
            parts.push("UNIQUE".to_string());
        }
        if let Some(expr) = &self.default_expr {
            parts.push(format!("DEFAULT {}", expr));
        }
        if !self.checks.is_empty() {
            parts.push(format!("CHECK({})", self.checks.join(" AND ")));
        }
        parts.join(" ")
    }
}

fn checks(field: &SchemaField) -> Vec<String> {
    let name = &field.name;
    let mut out = Vec::new();

    if !field.enum_values.is_empty() {
        let allowed: Vec<String> = field.enum_values.iter().map(|v| quoted(v)).collect();
        out.push(format!("{} IN ({})", name, allowed.join(", ")));
    }

    // Bounds mean value for numbers and length for strings
    let subject = if field.field_type.is_numeric() {
        name.clone()
    } else if field.field_type.is_string_like() {
        format!("length({})", name)
    } else {
        return out;
    };
    if let Some(min) = field.min {
        out.push(format!("{} >= {}", subject, min));
    }
    if let Some(max) = field.max {
        out.push(format!("{} <= {}", subject, max));
    }
    out
}

fn default_expr(default: &DefaultValue, field_type: &FieldType, dialect: SqlDialect) -> String {
    match default {
        DefaultValue::Now => match field_type {
            FieldType::Date => "CURRENT_DATE".to_string(),
            _ => "CURRENT_TIMESTAMP".to_string(),
        },
        DefaultValue::Literal(value) => literal(value, dialect),
    }
}

fn quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn literal(value: &Value, dialect: SqlDialect) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quoted(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => dialect.bool_literal(*b).to_string(),
        // structured defaults are stored as their JSON text
        other => quoted(&other.to_string()),
    }
}

impl Schema {
    /// Column definitions in declaration order
    pub fn to_column_definitions(&self, dialect: SqlDialect) -> Vec<ColumnDef> {
        self.fields()
            .iter()
            .map(|f| ColumnDef::from_field(f, dialect))
            .collect()
    }

    /// `CREATE TABLE IF NOT EXISTS` statement built from the column definitions
    pub fn create_table_sql(&self, table: &str, dialect: SqlDialect) -> String {
        let columns: Vec<String> = self
            .to_column_definitions(dialect)
            .iter()
            .map(ColumnDef::to_sql)
            .collect();
        format!("CREATE TABLE IF NOT EXISTS {} ({})", table, columns.join(", "))
    }
}
