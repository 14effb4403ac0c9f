//! Event type definition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::Category;

/// Snapshot of an event type, sufficient to build a validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub name: String,
    pub category: Category,
    pub schema: Value,
    /// Dot-notation paths, relative to `schema`, that must be declared in it.
    #[serde(default, alias = "partition_key_fields")]
    pub significant_fields: Vec<String>,
}

impl EventType {
    pub fn new(name: &str, category: Category, schema: Value) -> Self {
        Self {
            name: name.to_string(),
            category,
            schema,
            significant_fields: Vec::new(),
        }
    }

    pub fn with_significant_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.significant_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
