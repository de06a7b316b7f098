//! Unified error model
//!
//! One error shape ([`UnifiedError`]) for user failures, API helpers,
//! validation escalation and system faults, plus the `{result, error}`
//! contract that turns it into a plain [`ErrorPayload`].

mod api;
pub mod codes;
mod contract;
mod payload;
mod unified;

pub use api::{bad_request, conflict, forbidden, not_found, server_error, unauthorized, ApiFailure};
pub use contract::{attempt, display_value, fail, fail_with, Outcome};
pub use payload::ErrorPayload;
pub use unified::{ErrorClass, ErrorResponse, UnifiedError};
