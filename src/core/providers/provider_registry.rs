//! Provider Registry
//!
//! Immutable set of configured providers, each paired with the adapter that serves it.
//! A registry is built once from configuration; reloading swaps in a whole new one.

use super::descriptor::{ProviderDescriptor, ProviderId};
use super::{HttpTransport, create_adapter};
use crate::config::ProviderConfig;
use crate::core::traits::ProviderAdapter;
use crate::utils::error::{OrchestratorError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A provider descriptor with its adapter
#[derive(Debug, Clone)]
pub struct RegisteredProvider {
    pub descriptor: Arc<ProviderDescriptor>,
    pub adapter: Arc<dyn ProviderAdapter>,
}

/// Provider registry keyed by provider id
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<ProviderId, RegisteredProvider>,
}

impl ProviderRegistry {
    /// Create new provider registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from provider configuration, skipping disabled entries
    pub fn from_config(configs: &[ProviderConfig], transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            if !config.enabled {
                tracing::debug!(provider = %config.name, "provider disabled, skipping");
                continue;
            }
            let descriptor = ProviderDescriptor::from_config(config)?;
            let adapter = create_adapter(descriptor.provider_type, transport.clone());
            registry.register(descriptor, adapter)?;
        }
        Ok(registry)
    }

    /// Register a provider
    pub fn register(
        &mut self,
        descriptor: ProviderDescriptor,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Result<()> {
        if self.providers.contains_key(&descriptor.name) {
            return Err(OrchestratorError::registry(format!(
                "duplicate provider id: {}",
                descriptor.name
            )));
        }

        tracing::debug!(
            provider = %descriptor.name,
            provider_type = %descriptor.provider_type,
            adapter = adapter.name(),
            credential = %descriptor.credential.describe(),
            "registered provider"
        );
        self.providers.insert(
            descriptor.name.clone(),
            RegisteredProvider {
                descriptor: Arc::new(descriptor),
                adapter,
            },
        );
        Ok(())
    }

    /// Builder-style registration
    pub fn with_provider(
        mut self,
        descriptor: ProviderDescriptor,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Result<Self> {
        self.register(descriptor, adapter)?;
        Ok(self)
    }

    /// Get provider by id
    pub fn get(&self, id: &str) -> Option<&RegisteredProvider> {
        self.providers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Providers in id order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.providers.values()
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.keys().cloned().collect()
    }

    /// Get provider count
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
