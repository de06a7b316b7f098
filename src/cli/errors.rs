//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit status.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::error::UnifiedError;
use crate::schema::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/input file)
    IoError,
    /// Schema document or lookup error
    SchemaError,
    /// Input is not a JSON object or request line
    InvalidInput,
    /// Uncaught developer error while processing a record
    Uncaught,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PARSLEY_CLI_CONFIG_ERROR",
            Self::IoError => "PARSLEY_CLI_IO_ERROR",
            Self::SchemaError => "PARSLEY_CLI_SCHEMA_ERROR",
            Self::InvalidInput => "PARSLEY_CLI_INVALID_INPUT",
            Self::Uncaught => "PARSLEY_CLI_UNCAUGHT",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn schema_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SchemaError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::schema_error(format!("{} {}", e.code().code(), e.message()))
    }
}

impl From<UnifiedError> for CliError {
    fn from(e: UnifiedError) -> Self {
        Self::new(
            CliErrorCode::Uncaught,
            format!("{} ({}): {}", e.code(), e.class(), e.message()),
        )
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::invalid_input("expected a JSON object");
        assert_eq!(
            err.to_string(),
            "PARSLEY_CLI_INVALID_INPUT: expected a JSON object"
        );
    }

    #[test]
    fn test_schema_error_conversion() {
        let err: CliError = SchemaError::unknown_schema("Ghost").into();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.message().starts_with("SCHEMA-0008"));
    }

    #[test]
    fn test_uncaught_error_conversion() {
        let err: CliError = UnifiedError::type_error("bad argument").into();
        assert_eq!(err.code_str(), "PARSLEY_CLI_UNCAUGHT");
        assert!(err.message().contains("bad argument"));
    }
}
