//! Metadata cross-field strategy.
//!
//! Checks envelope metadata that a static schema cannot pin down for every
//! instance: the declared event type name and the `occurred_at` timestamp.

use std::sync::Arc;

use chrono::DateTime;
use serde_json::Value;

use crate::event_type::EventType;
use crate::validation::error::ValidationError;

use super::EventValidator;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataStrategy;

impl MetadataStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn materialize(&self, event_type: &EventType) -> Arc<dyn EventValidator> {
        Arc::new(MetadataValidator {
            event_type_name: event_type.name.clone(),
        })
    }
}

struct MetadataValidator {
    event_type_name: String,
}

impl EventValidator for MetadataValidator {
    fn validate(&self, event: &Value) -> Option<ValidationError> {
        // Presence and shape belong to schema conformance.
        let metadata = event.get("metadata")?.as_object()?;

        if let Some(declared) = metadata.get("event_type") {
            if declared.as_str() != Some(self.event_type_name.as_str()) {
                return Some(ValidationError::new(format!(
                    "#/metadata/event_type: {} is not a valid enum value",
                    display(declared)
                )));
            }
        }

        if let Some(occurred_at) = metadata.get("occurred_at").and_then(Value::as_str) {
            if DateTime::parse_from_rfc3339(occurred_at).is_err() {
                return Some(ValidationError::new(format!(
                    "#/metadata/occurred_at: [{}] is not a valid date-time",
                    occurred_at
                )));
            }
        }

        None
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}
