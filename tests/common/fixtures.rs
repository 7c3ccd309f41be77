//! Test fixtures and factories

use super::stubs::StubAdapter;
use ai_orchestrator::core::providers::ProviderDescriptor;
use ai_orchestrator::{NormalizedRequest, ProviderRegistry, ProviderType, RateTable};
use std::sync::Arc;

/// Builds a registry of stub-backed providers
#[derive(Default)]
pub struct RegistryBuilder {
    registry: ProviderRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider with the given priority and zero rates
    pub fn provider(self, name: &str, priority: u32, adapter: Arc<StubAdapter>) -> Self {
        self.descriptor(
            ProviderDescriptor::new(name, ProviderType::OpenAI, format!("{}-model", name)).with_priority(priority),
            adapter,
        )
    }

    /// Add a priced provider
    pub fn priced(self, name: &str, priority: u32, rates: RateTable, adapter: Arc<StubAdapter>) -> Self {
        self.descriptor(
            ProviderDescriptor::new(name, ProviderType::OpenAI, format!("{}-model", name))
                .with_priority(priority)
                .with_rates(rates),
            adapter,
        )
    }

    pub fn descriptor(mut self, descriptor: ProviderDescriptor, adapter: Arc<StubAdapter>) -> Self {
        self.registry
            .register(descriptor, adapter)
            .expect("unique provider names");
        self
    }

    pub fn build(self) -> ProviderRegistry {
        self.registry
    }
}

/// A plain chat request
pub fn request(prompt: &str) -> NormalizedRequest {
    NormalizedRequest::builder()
        .user(prompt)
        .build()
        .expect("valid request")
}
