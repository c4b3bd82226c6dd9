//! Access to reference fields on arbitrary entity representations.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// Anything that can report the raw value stored in a named field.
pub trait ReferenceFields {
    /// Raw stored value of `field`; `None` when absent or null.
    fn reference_value(&self, field: &str) -> Option<&str>;
}

impl ReferenceFields for Value {
    fn reference_value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

impl ReferenceFields for serde_json::Map<String, Value> {
    fn reference_value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

impl ReferenceFields for HashMap<String, String> {
    fn reference_value(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl ReferenceFields for HashMap<String, Option<String>> {
    fn reference_value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_deref())
    }
}

impl ReferenceFields for BTreeMap<String, Option<String>> {
    fn reference_value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_deref())
    }
}
