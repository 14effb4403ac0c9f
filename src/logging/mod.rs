//! Structured logging with publish context.
//!
//! Provides logging macros and utilities that include the flow id and event
//! type in every log message for easy correlation.

pub mod structured;

pub use structured::*;

/// Initialize the process logger.
///
/// `RUST_LOG` overrides the default `info` level. Safe to call repeatedly.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();
}
