//! Schema conformance strategy.
//!
//! Enriches the event type's schema once, compiles it, and checks each event
//! body against the compiled document.

use std::sync::Arc;

use serde_json::Value;

use crate::error::SetupError;
use crate::event_type::EventType;
use crate::validation::enrichment::enrich;
use crate::validation::error::ValidationError;
use crate::validation::evaluator::{CompiledSchema, SchemaEvaluator, Violation};

use super::EventValidator;

#[derive(Clone)]
pub struct SchemaConformanceStrategy {
    evaluator: Arc<dyn SchemaEvaluator>,
}

impl SchemaConformanceStrategy {
    pub fn new(evaluator: Arc<dyn SchemaEvaluator>) -> Self {
        Self { evaluator }
    }

    pub fn materialize(&self, event_type: &EventType) -> Result<Arc<dyn EventValidator>, SetupError> {
        let effective = enrich(event_type.category, &event_type.schema, &event_type.name)?;

        let compiled = self
            .evaluator
            .compile(effective.as_value())
            .map_err(|e| SetupError::SchemaCompilation {
                event_type: event_type.name.clone(),
                reason: e.reason,
            })?;

        log::debug!(
            "SCHEMA_COMPILED event_type={} category={}",
            event_type.name,
            event_type.category
        );

        Ok(Arc::new(SchemaConformanceValidator { compiled }))
    }
}

struct SchemaConformanceValidator {
    compiled: Box<dyn CompiledSchema>,
}

impl EventValidator for SchemaConformanceValidator {
    fn validate(&self, event: &Value) -> Option<ValidationError> {
        aggregate(&self.compiled.evaluate(event))
    }
}

/// Fold violations into one error.
///
/// A single violation is reported as-is; several are summarized on a root
/// line followed by one line per violation, in discovery order.
pub fn aggregate(violations: &[Violation]) -> Option<ValidationError> {
    match violations {
        [] => None,
        [single] => Some(ValidationError::new(single.to_string())),
        many => {
            let mut message = format!("#: {} schema violations found", many.len());
            for violation in many {
                message.push('\n');
                message.push_str(&violation.to_string());
            }
            Some(ValidationError::new(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_type::Category;
    use crate::validation::evaluator::JsonSchemaEvaluator;
    use serde_json::json;

    fn strategy() -> SchemaConformanceStrategy {
        SchemaConformanceStrategy::new(Arc::new(JsonSchemaEvaluator::default()))
    }

    #[test]
    fn test_aggregate() {
        assert_eq!(aggregate(&[]), None);

        let one = vec![Violation::new("/a", "bad")];
        assert_eq!(aggregate(&one), Some(ValidationError::new("#/a: bad")));

        let two = vec![Violation::new("", "first"), Violation::new("/b", "second")];
        assert_eq!(
            aggregate(&two),
            Some(ValidationError::new(
                "#: 2 schema violations found\n#: first\n#/b: second"
            ))
        );
    }

    #[test]
    fn test_undefined_event_missing_field() {
        let et = EventType::new(
            "et",
            Category::Undefined,
            json!({"type": "object", "required": ["foo"], "properties": {"foo": {"type": "string"}}}),
        );
        let validator = strategy().materialize(&et).unwrap();

        let error = validator.validate(&json!({"bar": 1})).unwrap();
        assert!(error.message().contains("foo"));
        assert!(validator.validate(&json!({"foo": "x"})).is_none());
    }

    #[test]
    fn test_broken_schema_is_setup_error() {
        let et = EventType::new("et", Category::Undefined, json!({"type": 12}));
        assert!(matches!(
            strategy().materialize(&et),
            Err(SetupError::SchemaCompilation { .. })
        ));
    }

    #[test]
    fn test_non_object_business_schema_is_setup_error() {
        let et = EventType::new("et", Category::Business, json!([]));
        assert!(matches!(
            strategy().materialize(&et),
            Err(SetupError::Enrichment(_))
        ));
    }
}
