//! Startup-time errors.
//!
//! Everything here is fatal while wiring the gate together. Per-event
//! violations are never reported through these types.

use thiserror::Error;

/// Strategy registry misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("validation strategy [{0}] is already registered")]
    DuplicateStrategy(String),

    #[error("validation strategy [{0}] is not registered")]
    UnknownStrategy(String),
}

/// Failure to derive the effective schema of an event type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("schema of event type [{event_type}] is already enriched")]
    AlreadyEnriched { event_type: String },

    #[error("schema of event type [{event_type}] must be a JSON object")]
    NotAnObject { event_type: String },

    #[error("schema of event type [{event_type}] has a malformed [{keyword}] keyword")]
    MalformedKeyword { event_type: String, keyword: String },
}

/// Invalid validation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read validation config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse validation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("category [{category}] references unknown strategy [{strategy}]")]
    UnknownStrategy { category: String, strategy: String },
}

/// Any failure while building a validator for an event type.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("schema of event type [{event_type}] failed to compile: {reason}")]
    SchemaCompilation { event_type: String, reason: String },
}
