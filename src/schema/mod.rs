//! Schema subsystem
//!
//! Schemas are immutable, named, ordered sets of typed fields. They are
//! declared once, checked at declaration time, and shared by reference
//! (`Arc<Schema>`) with every record built from them.
//!
//! # Design Principles
//!
//! - Broken declarations fail at `define`, never at validation time
//! - Metadata is for UI hints and never changes validation
//! - Declaration order drives column order and `keys()`, not validation

mod columns;
mod definition;
mod errors;
mod registry;
mod title;
mod types;

pub use columns::{ColumnDef, SqlDialect};
pub use definition::{FieldSpec, SchemaDefinition};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use registry::SchemaRegistry;
pub use title::to_title_case;
pub use types::{DefaultValue, FieldType, Format, Schema, SchemaField};
