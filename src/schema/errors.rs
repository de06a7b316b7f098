//! Schema error types
//!
//! Error codes:
//! - SCHEMA-0001 duplicate field (FATAL)
//! - SCHEMA-0002 invalid pattern (FATAL)
//! - SCHEMA-0003 constraint incompatible with field type (FATAL)
//! - SCHEMA-0004 enum without values (FATAL)
//! - SCHEMA-0005 invalid default value (FATAL)
//! - SCHEMA-0006 conflicting field flags (FATAL)
//! - SCHEMA-0007 schema name already registered (FATAL)
//! - SCHEMA-0008 unknown schema (REJECT)
//! - SCHEMA-0009 malformed schema document (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected; the program keeps running
    Reject,
    /// Broken declaration; the program cannot run
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field name declared twice
    DuplicateField,
    /// Custom pattern does not compile
    InvalidPattern,
    /// Constraint cannot apply to the declared type
    IncompatibleConstraint,
    /// Enum field with zero allowed values
    EmptyEnum,
    /// Default value violates the field's own rules
    InvalidDefault,
    /// Mutually exclusive flags (auto+required, required+nullable, min>max)
    ConflictingFlags,
    /// Schema name already registered
    DuplicateSchema,
    /// Schema name not registered
    UnknownSchema,
    /// Schema document unreadable or not valid JSON
    MalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::DuplicateField => "SCHEMA-0001",
            SchemaErrorCode::InvalidPattern => "SCHEMA-0002",
            SchemaErrorCode::IncompatibleConstraint => "SCHEMA-0003",
            SchemaErrorCode::EmptyEnum => "SCHEMA-0004",
            SchemaErrorCode::InvalidDefault => "SCHEMA-0005",
            SchemaErrorCode::ConflictingFlags => "SCHEMA-0006",
            SchemaErrorCode::DuplicateSchema => "SCHEMA-0007",
            SchemaErrorCode::UnknownSchema => "SCHEMA-0008",
            SchemaErrorCode::MalformedSchema => "SCHEMA-0009",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::UnknownSchema => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context.
///
/// Raised when a declaration is structurally invalid (a DefinitionError)
/// or when the registry cannot resolve a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema: Option<String>,
    field: Option<String>,
}

impl SchemaError {
    fn for_field(
        code: SchemaErrorCode,
        schema: &str,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: format!("schema {} field '{}': {}", schema, field, message.into()),
            schema: Some(schema.to_string()),
            field: Some(field.to_string()),
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(schema: &str, field: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::DuplicateField,
            schema,
            field,
            "declared more than once",
        )
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(schema: &str, field: &str, reason: impl fmt::Display) -> Self {
        Self::for_field(
            SchemaErrorCode::InvalidPattern,
            schema,
            field,
            format!("invalid regex pattern: {}", reason),
        )
    }

    /// Create an incompatible constraint error
    pub fn incompatible_constraint(
        schema: &str,
        field: &str,
        constraint: &str,
        field_type: impl fmt::Display,
    ) -> Self {
        Self::for_field(
            SchemaErrorCode::IncompatibleConstraint,
            schema,
            field,
            format!("'{}' cannot apply to a {} field", constraint, field_type),
        )
    }

    /// Create an empty enum error
    pub fn empty_schema_reference(schema: &str, field: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::IncompatibleConstraint,
            schema,
            field,
            "object field names an empty schema",
        )
    }

    pub fn empty_enum(schema: &str, field: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::EmptyEnum,
            schema,
            field,
            "enum requires at least one allowed value",
        )
    }

    /// Create an invalid default error
    pub fn invalid_default(schema: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::for_field(
            SchemaErrorCode::InvalidDefault,
            schema,
            field,
            format!("invalid default: {}", reason.into()),
        )
    }

    /// Create a conflicting flags error
    pub fn conflicting_flags(schema: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::for_field(SchemaErrorCode::ConflictingFlags, schema, field, reason)
    }

    /// Create a duplicate schema error
    pub fn duplicate_schema(schema: impl Into<String>) -> Self {
        let name = schema.into();
        Self {
            code: SchemaErrorCode::DuplicateSchema,
            message: format!("Schema '{}' is already defined", name),
            schema: Some(name),
            field: None,
        }
    }

    /// Create an unknown schema error
    pub fn unknown_schema(schema: impl Into<String>) -> Self {
        let name = schema.into();
        Self {
            code: SchemaErrorCode::UnknownSchema,
            message: format!("Schema '{}' not found", name),
            schema: Some(name),
            field: None,
        }
    }

    /// Create an error for a malformed schema document
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedSchema,
            message: format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            schema: None,
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema name if applicable
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::DuplicateField.code(), "SCHEMA-0001");
        assert_eq!(SchemaErrorCode::InvalidPattern.code(), "SCHEMA-0002");
        assert_eq!(SchemaErrorCode::EmptyEnum.code(), "SCHEMA-0004");
        assert_eq!(SchemaErrorCode::UnknownSchema.code(), "SCHEMA-0008");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::DuplicateField.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::UnknownSchema.severity(), Severity::Reject);
        assert!(SchemaError::empty_enum("Task", "status").is_fatal());
        assert!(!SchemaError::unknown_schema("Ghost").is_fatal());
    }

    #[test]
    fn test_field_context_in_display() {
        let err = SchemaError::incompatible_constraint("User", "active", "format", "boolean");
        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("SCHEMA-0003"));
        assert!(display.contains("active"));
        assert_eq!(err.field(), Some("active"));
        assert_eq!(err.schema(), Some("User"));
    }
}
