//! Event type model.
//!
//! Read-only snapshot of an event type as handed over by the registry
//! collaborator:
//! - Category (undefined, business, data change)
//! - Event type definition (name, schema, significant fields)

pub mod category;
pub mod definition;

pub use category::*;
pub use definition::*;
