//! Observable events
//!
//! Events are explicit and typed. Each carries its own severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Schema lifecycle
    /// A schema declaration compiled successfully
    SchemaDefined,
    /// A schema was added to a registry
    SchemaRegistered,
    /// A schema document or registration was refused
    SchemaRejected,
    /// A schema directory was loaded
    SchemasLoaded,

    // Records
    /// A validation pass completed
    RecordValidated,
    /// An invalid record was escalated to an error
    RecordRejected,

    // Errors
    /// A unified error was captured by the propagation contract
    ErrorRaised,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaDefined => "SCHEMA_DEFINED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::RecordValidated => "RECORD_VALIDATED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::ErrorRaised => "ERROR_RAISED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaDefined | Event::RecordValidated => Severity::Trace,
            Event::ConfigLoaded | Event::SchemaRegistered | Event::SchemasLoaded => Severity::Info,
            Event::RecordRejected | Event::ErrorRaised => Severity::Warn,
            Event::SchemaRejected => Severity::Fatal,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
