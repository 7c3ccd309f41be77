//! Provider descriptors
//!
//! A descriptor is the immutable identity of one configured provider: where it lives,
//! how to authenticate, what it can do and what it costs. Descriptors are built from
//! configuration and only replaced wholesale on reload.

use super::credentials::CredentialRef;
use super::provider_type::ProviderType;
use super::unified_provider::ProviderError;
use crate::config::ProviderConfig;
use crate::core::cost::RateTable;
use crate::core::types::{Capability, CapabilitySet, NormalizedRequest};
use crate::utils::error::{OrchestratorError, Result};
use std::collections::BTreeMap;

/// Provider identifier (unique within a registry)
pub type ProviderId = String;

/// Immutable description of a configured provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDescriptor {
    /// Configured provider id, e.g. `openai-primary`
    pub name: ProviderId,
    /// Type tag selecting the adapter
    pub provider_type: ProviderType,
    /// API base URL
    pub endpoint: String,
    /// Upstream model (or Azure deployment) name
    pub model: String,
    /// Credential reference; never the raw key
    pub credential: CredentialRef,
    /// Offered capabilities
    pub capabilities: CapabilitySet,
    /// Cost per unit
    pub rates: RateTable,
    /// Lower value = tried earlier
    pub priority: u32,
    /// API version (Anthropic, Azure)
    pub api_version: Option<String>,
    /// Extra headers sent with every call
    pub headers: BTreeMap<String, String>,
}

impl ProviderDescriptor {
    /// Create a descriptor with default endpoint, chat capability and zero rates
    pub fn new(name: impl Into<String>, provider_type: ProviderType, model: impl Into<String>) -> Self {
        let mut capabilities = CapabilitySet::new();
        capabilities.insert(Capability::chat());

        Self {
            name: name.into(),
            provider_type,
            endpoint: provider_type.default_base_url().unwrap_or_default().to_string(),
            model: model.into(),
            credential: CredentialRef::None,
            capabilities,
            rates: RateTable::default(),
            priority: 100,
            api_version: None,
            headers: BTreeMap::new(),
        }
    }

    /// Build a descriptor from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let endpoint = config
            .base_url
            .as_deref()
            .or_else(|| config.provider_type.default_base_url())
            .ok_or_else(|| {
                OrchestratorError::config(format!(
                    "provider {} ({}) requires base_url",
                    config.name, config.provider_type
                ))
            })?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            name: config.name.clone(),
            provider_type: config.provider_type,
            endpoint,
            model: config.model.clone(),
            credential: config.credential.clone(),
            capabilities: config.capabilities.iter().cloned().collect(),
            rates: config.pricing.clone(),
            priority: config.priority,
            api_version: config.api_version.clone(),
            headers: config.headers.clone(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_credential(mut self, credential: CredentialRef) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_capabilities<I, C>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Capability>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// First required capability this provider lacks, if any
    pub fn missing_capability<'a>(&self, required: &'a CapabilitySet) -> Option<&'a Capability> {
        required.iter().find(|c| !self.capabilities.contains(*c))
    }

    pub fn supports(&self, required: &CapabilitySet) -> bool {
        self.missing_capability(required).is_none()
    }

    /// Fail fast, without any I/O, when the request needs something this provider lacks
    pub fn ensure_supports(
        &self,
        adapter: &'static str,
        request: &NormalizedRequest,
    ) -> std::result::Result<(), ProviderError> {
        match self.missing_capability(request.required_capabilities()) {
            Some(capability) => Err(ProviderError::unsupported_capability(
                adapter,
                capability.as_str(),
            )),
            None => Ok(()),
        }
    }
}
