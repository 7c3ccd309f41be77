//! Configuration management for the orchestrator
//!
//! Configuration is a YAML document with an `orchestrator` root:
//!
//! ```yaml
//! orchestrator:
//!   providers:
//!     - name: openai-primary
//!       provider_type: openai
//!       model: gpt-4o-mini
//!       credential:
//!         env: OPENAI_API_KEY
//!       capabilities: [chat, json]
//!       pricing:
//!         input_cost_per_1k_tokens: 0.00015
//!         output_cost_per_1k_tokens: 0.0006
//!       priority: 1
//!   router:
//!     default_deadline_ms: 30000
//! ```
//!
//! Selected settings can be overridden through `ORCHESTRATOR_*` environment variables.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{OrchestratorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Orchestrator configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Load configuration from file, apply environment overrides and validate
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| OrchestratorError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml_str(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        debug!(
            providers = config.orchestrator.providers.len(),
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    /// Parse configuration from a YAML string without validating it
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| OrchestratorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply `ORCHESTRATOR_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let orchestrator = &mut self.orchestrator;

        if let Some(value) = lookup("ORCHESTRATOR_DEFAULT_DEADLINE_MS") {
            orchestrator.router.default_deadline_ms = parse_override("ORCHESTRATOR_DEFAULT_DEADLINE_MS", &value)?;
        }
        if let Some(value) = lookup("ORCHESTRATOR_ATTEMPT_TIMEOUT_FRACTION") {
            orchestrator.router.attempt_timeout_fraction =
                parse_override("ORCHESTRATOR_ATTEMPT_TIMEOUT_FRACTION", &value)?;
        }
        if let Some(value) = lookup("ORCHESTRATOR_PROBE_INTERVAL_SECS") {
            orchestrator.health.probe_interval_secs = parse_override("ORCHESTRATOR_PROBE_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = lookup("ORCHESTRATOR_PROBES_ENABLED") {
            orchestrator.health.probes_enabled = parse_override("ORCHESTRATOR_PROBES_ENABLED", &value)?;
        }
        if let Some(value) = lookup("ORCHESTRATOR_UNAVAILABLE_AFTER") {
            orchestrator.health.unavailable_after = parse_override("ORCHESTRATOR_UNAVAILABLE_AFTER", &value)?;
        }

        Ok(())
    }

    /// Get providers configuration
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.orchestrator.providers
    }

    /// Get router settings
    pub fn router(&self) -> &RouterConfig {
        &self.orchestrator.router
    }

    pub fn health(&self) -> &HealthMonitorConfig {
        &self.orchestrator.health
    }

    pub fn cost(&self) -> &CostConfig {
        &self.orchestrator.cost
    }

    pub fn http(&self) -> &HttpConfig {
        &self.orchestrator.http
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.orchestrator
            .providers
            .as_slice()
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Provider config error: {}", e)))?;

        self.orchestrator
            .router
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Router config error: {}", e)))?;

        self.orchestrator
            .health
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Health config error: {}", e)))?;

        self.orchestrator
            .cost
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Cost config error: {}", e)))?;

        self.orchestrator
            .http
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("HTTP config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| OrchestratorError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| OrchestratorError::Config(format!("Invalid value for {}: {} ({})", key, value, e)))
}
