//! Records: schema-bound, immutable data values

mod model;
mod view;

pub use model::Record;
pub use view::{spread_into, to_json_string, DataView};
