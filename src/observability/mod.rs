//! Observability subsystem
//!
//! Structured JSON logging of typed lifecycle events.
//!
//! ```ignore
//! use parsley_schema::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SchemaRegistered, &[("schema", "User")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Verifies no panic
        log_event(Event::ConfigLoaded);
        log_event(Event::RecordValidated);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::SchemasLoaded, &[("schema_dir", "/tmp/schemas")]);
    }
}
