//! Strategy registry.
//!
//! Strategies are registered by name through a builder during startup. The
//! built registry has no mutation API and is shared behind an `Arc`, so
//! concurrent lookups need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;

use super::evaluator::SchemaEvaluator;
use super::strategy::{
    FieldPresenceStrategy, MetadataStrategy, SchemaConformanceStrategy, Strategy, FIELD_PRESENCE,
    METADATA_CROSS_FIELD, SCHEMA_CONFORMANCE,
};

/// Write phase of the registry.
#[derive(Debug, Default)]
pub struct StrategyRegistryBuilder {
    strategies: HashMap<String, Strategy>,
}

impl StrategyRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `strategy` under `name`. Names are unique.
    pub fn register(&mut self, name: &str, strategy: Strategy) -> Result<&mut Self, RegistryError> {
        if self.strategies.contains_key(name) {
            log::error!("STRATEGY_DUPLICATE name={}", name);
            return Err(RegistryError::DuplicateStrategy(name.to_string()));
        }

        log::debug!("STRATEGY_REGISTERED name={} kind={}", name, strategy.kind());
        self.strategies.insert(name.to_string(), strategy);
        Ok(self)
    }

    pub fn build(self) -> StrategyRegistry {
        let mut names: Vec<&String> = self.strategies.keys().collect();
        names.sort();
        log::info!("STRATEGY_REGISTRY_BUILT strategies={:?}", names);

        StrategyRegistry {
            strategies: self.strategies,
        }
    }
}

/// Read-only name -> strategy mapping.
#[derive(Debug)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Strategy>,
}

impl StrategyRegistry {
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::new()
    }

    /// Registry holding the built-in strategies under their standard names.
    pub fn standard(evaluator: Arc<dyn SchemaEvaluator>) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        builder
            .register(
                SCHEMA_CONFORMANCE,
                Strategy::SchemaConformance(SchemaConformanceStrategy::new(evaluator)),
            )?
            .register(
                METADATA_CROSS_FIELD,
                Strategy::MetadataCrossField(MetadataStrategy::new()),
            )?
            .register(
                FIELD_PRESENCE,
                Strategy::FieldPresence(FieldPresenceStrategy::new()),
            )?;
        Ok(builder.build())
    }

    pub fn get(&self, name: &str) -> Result<&Strategy, RegistryError> {
        self.strategies
            .get(name)
            .ok_or_else(|| RegistryError::UnknownStrategy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
