//! Validator cache.
//!
//! Keeps one composite validator per event type name. Builds run outside the
//! lock, so a slow schema compilation never blocks lookups of other event
//! types; racing builds of the same snapshot keep whichever landed first.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::error::SetupError;
use crate::event_type::EventType;

use super::orchestrator::{EventTypeValidator, EventValidation};

struct CacheEntry {
    snapshot: EventType,
    validator: Arc<EventTypeValidator>,
}

pub struct ValidatorCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    created_at: Instant,
}

impl Default for ValidatorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            created_at: Instant::now(),
        }
    }

    /// Cached validator for `event_type`, building it on first use.
    ///
    /// A cached entry built from a different snapshot (schema, category or
    /// significant fields changed) is replaced.
    pub fn get_or_build(
        &self,
        validation: &EventValidation,
        event_type: &EventType,
    ) -> Result<Arc<EventTypeValidator>, SetupError> {
        if let Some(validator) = self.lookup(event_type) {
            return Ok(validator);
        }

        let built = Arc::new(validation.for_type(event_type)?);

        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(&event_type.name) {
            if entry.snapshot == *event_type {
                return Ok(Arc::clone(&entry.validator));
            }
            log::info!("VALIDATOR_CACHE_REPLACED event_type={}", event_type.name);
        }

        entries.insert(
            event_type.name.clone(),
            CacheEntry {
                snapshot: event_type.clone(),
                validator: Arc::clone(&built),
            },
        );
        log::debug!(
            "VALIDATOR_CACHE_STORED event_type={} size={}",
            event_type.name,
            entries.len()
        );

        Ok(built)
    }

    fn lookup(&self, event_type: &EventType) -> Option<Arc<EventTypeValidator>> {
        let entries = self.entries.read();
        entries
            .get(&event_type.name)
            .filter(|entry| entry.snapshot == *event_type)
            .map(|entry| Arc::clone(&entry.validator))
    }

    /// Drop the validator of one event type.
    pub fn invalidate(&self, event_type_name: &str) -> bool {
        let removed = self.entries.write().remove(event_type_name).is_some();
        if removed {
            log::info!("VALIDATOR_CACHE_INVALIDATED event_type={}", event_type_name);
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        log::info!("VALIDATOR_CACHE_CLEARED");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Seconds since the cache was created (for logging).
    pub fn cache_age_secs(&self) -> u64 {
        self.created_at.elapsed().as_secs()
    }
}
