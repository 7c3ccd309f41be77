//! Provider adapters and registry
//!
//! One adapter per API family; every configured provider is described by a
//! [`ProviderDescriptor`] and served by the adapter for its family.

// Base infrastructure
pub mod base;

// Adapter families
pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai_compatible;

// Identity, credentials and registry
pub mod credentials;
pub mod descriptor;
pub mod provider_registry;
pub mod provider_type;
pub mod unified_provider;

pub use anthropic::AnthropicAdapter;
pub use base::{HttpTransport, ReqwestTransport};
pub use credentials::{CredentialRef, Secret};
pub use descriptor::{ProviderDescriptor, ProviderId};
pub use gemini::GeminiAdapter;
pub use ollama::OllamaAdapter;
pub use openai_compatible::OpenAICompatibleAdapter;
pub use provider_registry::{ProviderRegistry, RegisteredProvider};
pub use provider_type::{AdapterFamily, ProviderType};
pub use unified_provider::{AdapterFailure, ErrorKind, ProviderError};

use crate::core::traits::ProviderAdapter;
use std::sync::Arc;

/// Create the adapter serving a provider type
pub fn create_adapter(provider_type: ProviderType, transport: Arc<dyn HttpTransport>) -> Arc<dyn ProviderAdapter> {
    match provider_type.family() {
        AdapterFamily::OpenAICompatible => Arc::new(OpenAICompatibleAdapter::new(transport)),
        AdapterFamily::Anthropic => Arc::new(AnthropicAdapter::new(transport)),
        AdapterFamily::Gemini => Arc::new(GeminiAdapter::new(transport)),
        AdapterFamily::Ollama => Arc::new(OllamaAdapter::new(transport)),
    }
}
