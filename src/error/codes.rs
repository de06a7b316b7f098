//! Error-code catalog
//!
//! Validation codes live in `validation::ValidationCode`; definition codes
//! (`SCHEMA-0001`..`SCHEMA-0009`) in `schema::SchemaErrorCode`.

/// Default code for `fail(message)` and payloads without a `code`
pub const USER: &str = "USER-0001";

/// Record validation escalated through `fail_if_invalid`
pub const VALIDATION: &str = "VALIDATION";

pub const HTTP_BAD_REQUEST: &str = "HTTP-400";
pub const HTTP_UNAUTHORIZED: &str = "HTTP-401";
pub const HTTP_FORBIDDEN: &str = "HTTP-403";
pub const HTTP_NOT_FOUND: &str = "HTTP-404";
pub const HTTP_CONFLICT: &str = "HTTP-409";
pub const HTTP_SERVER_ERROR: &str = "HTTP-500";

/// Malformed `fail` argument
pub const TYPE_FAIL_ARGUMENT: &str = "TYPE-0005";

/// Reference to an undeclared name (field, schema)
pub const UNDEFINED: &str = "UNDEFINED-0001";

/// I/O fault
pub const IO: &str = "IO-0001";

/// Unclassified host fault
pub const INTERNAL: &str = "INTERNAL-0001";

/// Status used when a payload carries none
pub const DEFAULT_HTTP_STATUS: u16 = 500;

/// Status attached to validation payloads
pub const VALIDATION_HTTP_STATUS: u16 = 400;
