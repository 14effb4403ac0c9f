//! Validation strategies.
//!
//! A strategy is a named unit of validation logic. Materializing it for an
//! event type does any one-time work (schema compilation, schema lookups)
//! and yields a validator that is cheap to call per event.

use std::sync::Arc;

use serde_json::Value;

use crate::error::SetupError;
use crate::event_type::EventType;

use super::error::ValidationError;

pub mod field_presence;
pub mod metadata;
pub mod schema;

pub use field_presence::FieldPresenceStrategy;
pub use metadata::MetadataStrategy;
pub use schema::SchemaConformanceStrategy;

pub const SCHEMA_CONFORMANCE: &str = "schema-conformance";
pub const METADATA_CROSS_FIELD: &str = "metadata-cross-field";
pub const FIELD_PRESENCE: &str = "field-presence";

/// Validates single events of one event type.
pub trait EventValidator: Send + Sync {
    fn validate(&self, event: &Value) -> Option<ValidationError>;
}

/// The known strategies.
#[derive(Clone)]
pub enum Strategy {
    SchemaConformance(SchemaConformanceStrategy),
    MetadataCrossField(MetadataStrategy),
    FieldPresence(FieldPresenceStrategy),
}

impl Strategy {
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::SchemaConformance(_) => SCHEMA_CONFORMANCE,
            Strategy::MetadataCrossField(_) => METADATA_CROSS_FIELD,
            Strategy::FieldPresence(_) => FIELD_PRESENCE,
        }
    }

    /// Build the validator this strategy contributes for `event_type`.
    pub fn materialize(&self, event_type: &EventType) -> Result<Arc<dyn EventValidator>, SetupError> {
        match self {
            Strategy::SchemaConformance(s) => s.materialize(event_type),
            Strategy::MetadataCrossField(s) => Ok(s.materialize(event_type)),
            Strategy::FieldPresence(s) => Ok(s.materialize(event_type)),
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Strategy").field(&self.kind()).finish()
    }
}
