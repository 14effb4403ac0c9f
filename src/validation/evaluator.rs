//! JSON Schema evaluator capability.
//!
//! Enrichment and orchestration only need two operations from an evaluator:
//! compile a document once, then evaluate events against it. The shipped
//! implementation wraps the `jsonschema` crate and renders its errors in the
//! broker's violation format (`#/<pointer>: <reason>`).

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::config::SchemaDraft;

/// A single schema non-conformance, scoped to a JSON pointer in the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pointer: String,
    reason: String,
}

impl Violation {
    /// `pointer` is an RFC 6901 pointer; empty for the document root.
    pub fn new(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.pointer, self.reason)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct SchemaCompileError {
    pub reason: String,
}

/// A compiled schema, shareable across threads.
pub trait CompiledSchema: Send + Sync {
    /// Violations in discovery order; empty when the document conforms.
    fn evaluate(&self, document: &Value) -> Vec<Violation>;
}

pub trait SchemaEvaluator: Send + Sync {
    fn compile(&self, schema: &Value) -> Result<Box<dyn CompiledSchema>, SchemaCompileError>;
}

/// Evaluator backed by the `jsonschema` crate.
///
/// Patterns the linear-time `regex` engine accepts are matched without
/// backtracking; the rest run under fancy-regex's backtrack limit and a
/// blown limit comes back as an ordinary violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEvaluator {
    draft: SchemaDraft,
}

impl JsonSchemaEvaluator {
    pub fn new(draft: SchemaDraft) -> Self {
        Self { draft }
    }
}

impl SchemaEvaluator for JsonSchemaEvaluator {
    fn compile(&self, schema: &Value) -> Result<Box<dyn CompiledSchema>, SchemaCompileError> {
        for pattern in backtracking_patterns(schema) {
            log::warn!(
                "PATTERN_BACKTRACKING_FALLBACK pattern={:?} engine=fancy-regex",
                pattern
            );
        }

        let draft = match self.draft {
            SchemaDraft::Draft4 => Draft::Draft4,
            SchemaDraft::Draft6 => Draft::Draft6,
            SchemaDraft::Draft7 => Draft::Draft7,
        };

        let compiled = JSONSchema::options()
            .with_draft(draft)
            .compile(schema)
            .map_err(|e| SchemaCompileError {
                reason: e.to_string(),
            })?;

        Ok(Box::new(JsonSchemaCompiled { schema: compiled }))
    }
}

struct JsonSchemaCompiled {
    schema: JSONSchema,
}

impl CompiledSchema for JsonSchemaCompiled {
    fn evaluate(&self, document: &Value) -> Vec<Violation> {
        match self.schema.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.flat_map(|error| to_violations(&error)).collect(),
        }
    }
}

fn to_violations(error: &jsonschema::ValidationError<'_>) -> Vec<Violation> {
    let pointer = error.instance_path.to_string();
    let instance: &Value = &error.instance;

    let reason = match &error.kind {
        ValidationErrorKind::Required { property } => {
            format!("required key [{}] not found", display_value(property))
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            // One violation per key.
            return unexpected
                .iter()
                .map(|key| {
                    Violation::new(
                        pointer.clone(),
                        format!("extraneous key [{}] is not permitted", key),
                    )
                })
                .collect();
        }
        ValidationErrorKind::Pattern { pattern } => format!(
            "string [{}] does not match pattern {}",
            display_value(instance),
            pattern
        ),
        ValidationErrorKind::Enum { .. } => {
            format!("{} is not a valid enum value", display_value(instance))
        }
        ValidationErrorKind::Format { format } => {
            format!("[{}] is not a valid {}", display_value(instance), format)
        }
        _ => error.to_string(),
    };

    vec![Violation::new(pointer, reason)]
}

/// Strings render bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Patterns in `schema` that the linear-time engine rejects.
///
/// Looks at `pattern` keywords and `patternProperties` keys at any depth.
pub fn backtracking_patterns(schema: &Value) -> Vec<String> {
    let mut patterns = Vec::new();
    collect_patterns(schema, &mut patterns);
    patterns
        .into_iter()
        .filter(|pattern| Regex::new(pattern).is_err())
        .collect()
}

fn collect_patterns(node: &Value, patterns: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("pattern", Value::String(pattern)) => patterns.push(pattern.clone()),
                    ("patternProperties", Value::Object(props)) => {
                        patterns.extend(props.keys().cloned());
                    }
                    _ => {}
                }
                collect_patterns(value, patterns);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_patterns(item, patterns);
            }
        }
        _ => {}
    }
}
