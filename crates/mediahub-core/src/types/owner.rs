//! Identifies the record that owns a reference field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A record in the entity store, addressed by table and primary key.
///
/// Keys are kept as strings: the hosted tables use both integer and UUID
/// primary keys and the entity store only ever echoes them back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    /// Table name (e.g. `company_info`, `products`).
    pub table: String,
    /// Primary key value.
    pub id: String,
}

impl OwnerRef {
    /// Create a new owner reference.
    pub fn new(table: impl Into<String>, id: impl ToString) -> Self {
        Self {
            table: table.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.table, self.id)
    }
}
