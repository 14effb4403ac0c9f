//! Event validation module.
//!
//! Publish-time validation of events against their event type:
//! - Schema enrichment with the broker envelope
//! - Evaluator capability over the `jsonschema` crate
//! - Named strategies (schema conformance, metadata, field presence)
//! - Write-once strategy registry
//! - Fail-fast orchestrator and per-event-type validator cache

pub mod cache;
pub mod enrichment;
pub mod error;
pub mod evaluator;
pub mod orchestrator;
pub mod registry;
pub mod strategy;

pub use cache::ValidatorCache;
pub use enrichment::{enrich, is_enriched, EffectiveSchema, UUID_PATTERN};
pub use error::ValidationError;
pub use evaluator::{CompiledSchema, JsonSchemaEvaluator, SchemaEvaluator, Violation};
pub use orchestrator::{EventTypeValidator, EventValidation};
pub use registry::{StrategyRegistry, StrategyRegistryBuilder};
pub use strategy::{EventValidator, Strategy};
