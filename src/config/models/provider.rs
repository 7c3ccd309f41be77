//! Provider configuration

use super::*;
use crate::core::cost::RateTable;
use crate::core::providers::{CredentialRef, ProviderType};
use crate::core::types::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique provider id
    pub name: String,
    /// Provider type (openai, anthropic, etc.)
    pub provider_type: ProviderType,
    /// Upstream model or deployment name
    pub model: String,
    /// Base URL; defaults per provider type (required for Azure)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Credential reference
    #[serde(default)]
    pub credential: CredentialRef,
    /// Offered capabilities
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,
    /// Cost table
    #[serde(default)]
    pub pricing: RateTable,
    /// Lower is preferred
    #[serde(default = "default_priority")]
    pub priority: u32,
    /// API version
    #[serde(default)]
    pub api_version: Option<String>,
    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Whether provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, provider_type: ProviderType, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_type,
            model: model.into(),
            base_url: None,
            credential: CredentialRef::None,
            capabilities: default_capabilities(),
            pricing: RateTable::default(),
            priority: default_priority(),
            api_version: None,
            headers: BTreeMap::new(),
            enabled: true,
        }
    }
}
