//! Validation pipeline configuration.
//!
//! Which strategies run for which category, in which order, and which
//! JSON Schema draft user schemas are compiled with.

use std::collections::HashMap;
use std::env;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event_type::Category;
use crate::validation::strategy::{FIELD_PRESENCE, METADATA_CROSS_FIELD, SCHEMA_CONFORMANCE};

/// Environment variable pointing at a JSON config file.
pub const CONFIG_PATH_ENV: &str = "EVENTGATE_VALIDATION_CONFIG";

/// JSON Schema draft used to compile effective schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDraft {
    Draft4,
    Draft6,
    #[default]
    Draft7,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub draft: SchemaDraft,
    /// Ordered strategy names per category.
    pub pipelines: HashMap<Category, Vec<String>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let envelope = vec![
            SCHEMA_CONFORMANCE.to_string(),
            METADATA_CROSS_FIELD.to_string(),
            FIELD_PRESENCE.to_string(),
        ];

        let mut pipelines = HashMap::new();
        pipelines.insert(Category::Undefined, vec![SCHEMA_CONFORMANCE.to_string()]);
        pipelines.insert(Category::Business, envelope.clone());
        pipelines.insert(Category::DataChange, envelope);

        Self {
            draft: SchemaDraft::default(),
            pipelines,
        }
    }
}

impl ValidationConfig {
    /// Parse a JSON config. Categories left out keep their default pipeline.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: ValidationConfig = serde_json::from_str(json)?;
        let defaults = ValidationConfig::default();
        for category in Category::ALL {
            if !config.pipelines.contains_key(&category) {
                config
                    .pipelines
                    .insert(category, defaults.pipeline(category).to_vec());
            }
        }
        Ok(config)
    }

    /// Load from the file named by `EVENTGATE_VALIDATION_CONFIG`, or defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                log::info!("VALIDATION_CONFIG_LOADED path={}", path);
                Self::from_json_str(&raw)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn pipeline(&self, category: Category) -> &[String] {
        self.pipelines
            .get(&category)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipelines() {
        let config = ValidationConfig::default();
        assert_eq!(config.pipeline(Category::Undefined), &[SCHEMA_CONFORMANCE]);
        assert_eq!(
            config.pipeline(Category::Business),
            &[SCHEMA_CONFORMANCE, METADATA_CROSS_FIELD, FIELD_PRESENCE]
        );
        assert_eq!(config.draft, SchemaDraft::Draft7);
    }

    #[test]
    fn test_from_json_fills_missing_categories() {
        let config = ValidationConfig::from_json_str(
            r#"{"draft": "draft4", "pipelines": {"undefined": ["schema-conformance", "field-presence"]}}"#,
        )
        .unwrap();

        assert_eq!(config.draft, SchemaDraft::Draft4);
        assert_eq!(
            config.pipeline(Category::Undefined),
            &[SCHEMA_CONFORMANCE, FIELD_PRESENCE]
        );
        assert_eq!(config.pipeline(Category::DataChange).len(), 3);
    }

    #[test]
    fn test_from_env_reads_file() {
        let path = env::temp_dir().join(format!("eventgate-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"draft": "draft6"}"#).unwrap();

        env::set_var(CONFIG_PATH_ENV, &path);
        let loaded = ValidationConfig::from_env();
        env::remove_var(CONFIG_PATH_ENV);
        fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.draft, SchemaDraft::Draft6);
        assert_eq!(config.pipeline(Category::Business).len(), 3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ValidationConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
