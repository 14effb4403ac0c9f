//! Publish batch gate.
//!
//! Validates a publish request's batch of raw events against the event
//! type's validator before anything reaches the log:
//! - Per-item JSON parsing
//! - Fail-fast validation with atomic batch abort
//! - Per-item responses (status, step, detail, eid)

pub mod context;
pub mod publish;

pub use context::*;
pub use publish::*;
