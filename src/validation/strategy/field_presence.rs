//! Field presence strategy.
//!
//! Significant fields (partition keys and the like) named by the event type
//! must be declared in its schema. The answer depends on the schema only,
//! so it is computed once when the validator is built.

use std::sync::Arc;

use serde_json::Value;

use crate::event_type::EventType;
use crate::validation::error::ValidationError;

use super::EventValidator;

/// Upper bound on chained local `$ref`s followed while resolving a field.
const MAX_REF_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldPresenceStrategy;

impl FieldPresenceStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn materialize(&self, event_type: &EventType) -> Arc<dyn EventValidator> {
        let missing = event_type
            .significant_fields
            .iter()
            .find(|field| !is_declared(&event_type.schema, field));

        let outcome = missing.map(|field| {
            log::warn!(
                "SIGNIFICANT_FIELD_UNDECLARED event_type={} field={}",
                event_type.name,
                field
            );
            ValidationError::new(format!(
                "#: significant field [{}] is not declared in the schema",
                field
            ))
        });

        Arc::new(FieldPresenceValidator { outcome })
    }
}

struct FieldPresenceValidator {
    outcome: Option<ValidationError>,
}

impl EventValidator for FieldPresenceValidator {
    fn validate(&self, _event: &Value) -> Option<ValidationError> {
        self.outcome.clone()
    }
}

/// Resolve a dot-notation path like `order.id` through nested `properties`.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use eventgate_core::validation::strategy::field_presence::is_declared;
///
/// let schema = json!({"properties": {"order": {"properties": {"id": {}}}}});
/// assert!(is_declared(&schema, "order.id"));
/// assert!(!is_declared(&schema, "order.total"));
/// ```
pub fn is_declared(schema: &Value, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }

    let mut node = schema;
    for segment in path.split('.') {
        node = follow_refs(schema, node);
        match node.get("properties").and_then(|p| p.get(segment)) {
            Some(next) => node = next,
            None => return false,
        }
    }
    true
}

fn follow_refs<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
    let mut current = node;
    for _ in 0..MAX_REF_DEPTH {
        let pointer = current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| reference.strip_prefix('#'));

        match pointer.and_then(|p| root.pointer(p)) {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}
