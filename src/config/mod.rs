use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_INDEX_ENDPOINT: &str = "/api/data-inputs/index";
const DEFAULT_KVSTORE_ENDPOINT: &str = "/api/data-inputs/kvstore";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Console backend that stores new data inputs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_index_endpoint")]
    pub index_endpoint: String,
    #[serde(default = "default_kvstore_endpoint")]
    pub kvstore_endpoint: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_endpoint: default_index_endpoint(),
            kvstore_endpoint: default_kvstore_endpoint(),
        }
    }
}

fn default_index_endpoint() -> String {
    DEFAULT_INDEX_ENDPOINT.to_string()
}

fn default_kvstore_endpoint() -> String {
    DEFAULT_KVSTORE_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (config file, then env, then CLI flags)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(cli.config.clone())?;
        settings.apply_cli_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    /// Load `<root>/datainputs.{toml,yaml,json}` if present
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("datainputs");
        let settings = Self::load(config_path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(config_path: PathBuf) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .set_default("backend.base_url", DEFAULT_BASE_URL)?
            .set_default("backend.index_endpoint", DEFAULT_INDEX_ENDPOINT)?
            .set_default("backend.kvstore_endpoint", DEFAULT_KVSTORE_ENDPOINT)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("DATAINPUTS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.backend_url {
            self.backend.base_url = url.clone();
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        let backend = BackendSettings::default();
        assert_eq!(backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(backend.index_endpoint, "/api/data-inputs/index");
        assert_eq!(backend.kvstore_endpoint, "/api/data-inputs/kvstore");
    }

    #[test]
    fn test_endpoints_default_when_omitted() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "backend": { "base_url": "https://console.local" }
        }))
        .unwrap();
        assert_eq!(settings.backend.index_endpoint, "/api/data-inputs/index");
        assert_eq!(settings.logging.level, "info");
    }
}
