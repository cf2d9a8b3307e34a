//! Configuration for codecheck

use compliance_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog location
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Engine defaults and layout parameters
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file, YAML or JSON
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_catalog_path() -> String {
    "data/catalog.yaml".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl CliConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `CODECHECK_` environment variables.
    ///
    /// Nested keys are joined with `__` so field names keep their
    /// underscores, e.g. `CODECHECK_ENGINE__INPUT__ROOM_LENGTH`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CliConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CODECHECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.catalog.path, "data/catalog.yaml");
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
        assert_eq!(config.engine.input.jurisdiction, "NBC");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "catalog:\n  path: /srv/catalog.json\nengine:\n  input:\n    jurisdiction: Alberta\n  layout:\n    wrap_margin: 1.5\nlogging:\n  json: true"
        )
        .unwrap();

        let config = CliConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.catalog.path, "/srv/catalog.json");
        assert_eq!(config.engine.input.jurisdiction, "Alberta");
        assert_eq!(config.engine.input.room_length, 10.0);
        assert_eq!(config.engine.layout.wrap_margin, 1.5);
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let config = CliConfig::load(path.to_str()).unwrap();
        assert_eq!(config.engine.layout.default_width, 1.2);
    }
}
