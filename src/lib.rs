//! EventGate Core - publish-time event validation
//!
//! Every event published under an event type is checked, before it is
//! appended to the log, against the owner's JSON Schema merged with the
//! broker envelope rules. The implementation prioritizes:
//!
//! 1. **Stable errors** - violation messages are a compatibility contract
//! 2. **Bounded latency** - no catastrophic backtracking on user patterns
//! 3. **Logging** - every build and rejection logged with context
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `event_type` - Event type snapshot and categories
//! - `validation` - Enrichment, evaluator, strategies, registry, orchestrator
//! - `pipeline` - Atomic validation of publish batches
//! - `config` - Per-category strategy pipelines
//! - `logging` - Structured logging with publish context
//!
//! ## Example
//!
//! ```
//! use eventgate_core::config::ValidationConfig;
//! use eventgate_core::event_type::{Category, EventType};
//! use eventgate_core::validation::EventValidation;
//! use serde_json::json;
//!
//! let validation = EventValidation::standard(ValidationConfig::default()).unwrap();
//! let et = EventType::new(
//!     "order.created",
//!     Category::Business,
//!     json!({"type": "object", "properties": {"order_id": {"type": "string"}}}),
//! );
//! let validator = validation.for_type(&et).unwrap();
//!
//! let error = validator.validate(&json!({"order_id": "o-1"})).unwrap();
//! assert_eq!(error.message(), "#: required key [metadata] not found");
//! ```

pub mod config;
pub mod error;
pub mod event_type;
pub mod logging;
pub mod pipeline;
pub mod validation;

pub use config::ValidationConfig;
pub use error::{ConfigError, EnrichmentError, RegistryError, SetupError};
pub use event_type::{Category, EventType};
pub use logging::init_logger;
pub use validation::{EventTypeValidator, EventValidation, ValidationError, ValidatorCache};
