//! Error types for the orchestrator
//!
//! Provider-level failures are modelled by [`ProviderError`] and terminal routing
//! failures by [`AggregateError`]. This module holds the crate-level error used for
//! everything around them: configuration, IO, parsing and registry construction.

use crate::core::providers::unified_provider::ProviderError;
use crate::core::router::error::AggregateError;
use thiserror::Error;

/// Result type alias for the orchestrator
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Provider errors raised outside of a routed call
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Terminal routing failure
    #[error("Routing failed: {0}")]
    Routing(#[from] AggregateError),

    /// Registry errors (duplicate or unknown providers)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrchestratorError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn registry<S: Into<String>>(message: S) -> Self {
        Self::Registry(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }
}
