//! Validation engine for schema-bound data
//!
//! Pure functions over a [`Schema`](crate::schema::Schema) and a JSON
//! object. Produces coerced, defaulted data plus at most one
//! [`ValidationError`] per field.

mod coerce;
mod engine;
mod errors;
pub mod messages;
mod rules;

pub use coerce::coerce;
pub use engine::{validate, Validation, ValidationOptions, Validator};
pub use errors::{ValidationCode, ValidationError};
pub use rules::check_present_value;
