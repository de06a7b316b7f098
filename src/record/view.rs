//! Read-only key/value capability.
//!
//! Spreading, property access and JSON encoding program against
//! [`DataView`], never against a concrete record type.

use serde_json::{Map, Value};

use super::model::Record;

pub trait DataView {
    fn get(&self, key: &str) -> Option<&Value>;

    /// Keys a consumer should iterate
    fn keys(&self) -> Vec<&str>;

    /// Populated key/value pairs
    fn pairs(&self) -> Vec<(&str, &Value)>;

    fn to_json(&self) -> Value;
}

impl DataView for Record {
    fn get(&self, key: &str) -> Option<&Value> {
        Record::get(self, key)
    }

    fn keys(&self) -> Vec<&str> {
        Record::keys(self)
    }

    fn pairs(&self) -> Vec<(&str, &Value)> {
        self.data().iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn to_json(&self) -> Value {
        Value::Object(self.data().clone())
    }
}

impl DataView for Map<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        Map::get(self, key)
    }

    fn keys(&self) -> Vec<&str> {
        Map::keys(self).map(String::as_str).collect()
    }

    fn pairs(&self) -> Vec<(&str, &Value)> {
        self.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn to_json(&self) -> Value {
        Value::Object(self.clone())
    }
}

/// `{...source}`: copies populated pairs into `target`, later keys winning
pub fn spread_into(target: &mut Map<String, Value>, source: &dyn DataView) {
    for (key, value) in source.pairs() {
        target.insert(key.to_string(), value.clone());
    }
}

pub fn to_json_string(view: &dyn DataView) -> String {
    view.to_json().to_string()
}
