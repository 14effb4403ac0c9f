//! Validation orchestrator.
//!
//! Assembles the category's strategy pipeline for an event type and exposes
//! it as one fail-fast validator.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ValidationConfig;
use crate::error::{ConfigError, SetupError};
use crate::event_type::{Category, EventType};
use crate::logging::structured::LogContext;
use crate::{log_debug, log_error, log_info};

use super::error::ValidationError;
use super::evaluator::JsonSchemaEvaluator;
use super::registry::StrategyRegistry;
use super::strategy::EventValidator;

/// Builds validators for event types.
#[derive(Debug, Clone)]
pub struct EventValidation {
    registry: Arc<StrategyRegistry>,
    config: ValidationConfig,
}

impl EventValidation {
    /// Every strategy named by `config` must exist in `registry`.
    pub fn new(registry: Arc<StrategyRegistry>, config: ValidationConfig) -> Result<Self, SetupError> {
        let ctx = LogContext::default();
        for category in Category::ALL {
            for name in config.pipeline(category) {
                if !registry.contains(name) {
                    log_error!(
                        ctx,
                        "VALIDATION_CONFIG_INVALID",
                        category = category.as_str(),
                        strategy = name,
                    );
                    return Err(ConfigError::UnknownStrategy {
                        category: category.to_string(),
                        strategy: name.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(Self { registry, config })
    }

    /// Standard registry with the `jsonschema` evaluator, configured by `config`.
    pub fn standard(config: ValidationConfig) -> Result<Self, SetupError> {
        let evaluator = Arc::new(JsonSchemaEvaluator::new(config.draft));
        let registry = StrategyRegistry::standard(evaluator)?;
        Self::new(Arc::new(registry), config)
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Materialize the pipeline for `event_type`, in configured order.
    pub fn for_type(&self, event_type: &EventType) -> Result<EventTypeValidator, SetupError> {
        let ctx = LogContext::for_event_type(&event_type.name);
        let names = self.config.pipeline(event_type.category);

        let mut validators = Vec::with_capacity(names.len());
        for name in names {
            let strategy = self.registry.get(name)?;
            log_debug!(ctx, "STRATEGY_MATERIALIZE", strategy = name);
            validators.push(strategy.materialize(event_type)?);
        }

        log_info!(
            ctx,
            "VALIDATOR_BUILT",
            category = event_type.category.as_str(),
            strategies = names,
        );

        Ok(EventTypeValidator {
            event_type: event_type.name.clone(),
            validators,
        })
    }
}

/// Composite validator of one event type.
pub struct EventTypeValidator {
    event_type: String,
    validators: Vec<Arc<dyn EventValidator>>,
}

impl EventTypeValidator {
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// First error of the pipeline, or `None` when every strategy passes.
    pub fn validate(&self, event: &Value) -> Option<ValidationError> {
        self.validators
            .iter()
            .find_map(|validator| validator.validate(event))
    }
}

impl EventValidator for EventTypeValidator {
    fn validate(&self, event: &Value) -> Option<ValidationError> {
        EventTypeValidator::validate(self, event)
    }
}

impl std::fmt::Debug for EventTypeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTypeValidator")
            .field("event_type", &self.event_type)
            .field("validators", &self.validators.len())
            .finish()
    }
}
