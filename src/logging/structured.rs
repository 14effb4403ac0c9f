//! Structured logging utilities.
//!
//! Provides context-aware logging with flow_id and event_type included
//! in every log message.

use std::fmt;

/// Logging context for a publish request.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    pub flow_id: Option<String>,
    pub event_type: Option<String>,
}

impl LogContext {
    pub fn new(flow_id: &str) -> Self {
        Self {
            flow_id: Some(flow_id.to_string()),
            event_type: None,
        }
    }

    /// Context outside any request, e.g. while building validators.
    pub fn for_event_type(event_type: &str) -> Self {
        Self {
            flow_id: None,
            event_type: Some(event_type.to_string()),
        }
    }

    pub fn with_event_type(&self, event_type: &str) -> Self {
        Self {
            flow_id: self.flow_id.clone(),
            event_type: Some(event_type.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.flow_id, &self.event_type) {
            (Some(flow), Some(et)) => write!(f, "[flow={}] [event_type={}]", flow, et),
            (Some(flow), None) => write!(f, "[flow={}]", flow),
            (None, Some(et)) => write!(f, "[event_type={}]", et),
            (None, None) => write!(f, "[-]"),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

/// Log an error message with context.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::error!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}
