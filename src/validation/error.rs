//! Per-event validation error.

use thiserror::Error;

/// A violation found while validating one event.
///
/// Carries either a single violation or an aggregated multi-violation
/// message. Two errors are equal iff their messages are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
