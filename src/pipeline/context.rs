//! Publish request context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one publish request.
#[derive(Debug, Clone)]
pub struct PublishContext {
    pub flow_id: String,
    pub event_type: String,
    pub received_at: DateTime<Utc>,
}

impl PublishContext {
    /// `flow_id` is the caller's correlation id; one is generated if absent.
    pub fn new(event_type: &str, flow_id: Option<&str>) -> Self {
        let flow_id = match flow_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => format!("flow-{}", &Uuid::new_v4().simple().to_string()[..8]),
        };

        Self {
            flow_id,
            event_type: event_type.to_string(),
            received_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.flow_id).with_event_type(&self.event_type)
    }
}
