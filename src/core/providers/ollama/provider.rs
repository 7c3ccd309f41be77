//! Ollama adapter

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;

use super::PROVIDER_NAME;
use super::transform;
use crate::core::providers::base::{ErrorMapper, HttpTransport, WireProtocol, base_headers, invoke_wire};
use crate::core::providers::credentials::Secret;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::AdapterFailure;
use crate::core::traits::ProviderAdapter;
use crate::core::types::{NormalizedRequest, ProviderResponse};

#[derive(Clone)]
pub struct OllamaAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl OllamaAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl fmt::Debug for OllamaAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaAdapter").finish_non_exhaustive()
    }
}

impl ErrorMapper for OllamaAdapter {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

impl WireProtocol for OllamaAdapter {
    fn endpoint(&self, descriptor: &ProviderDescriptor) -> String {
        transform::chat_url(descriptor)
    }

    /// Ollama itself is unauthenticated; a key is only sent when one is configured,
    /// for instances behind an authenticating proxy
    fn headers(&self, descriptor: &ProviderDescriptor, secret: Option<&Secret>) -> Vec<(String, String)> {
        let mut headers = base_headers(&descriptor.headers);
        if let Some(secret) = secret {
            headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", secret.expose()),
            ));
        }
        headers
    }

    fn transform_request(&self, request: &NormalizedRequest, descriptor: &ProviderDescriptor) -> Value {
        transform::build_chat_body(request, descriptor)
    }

    fn transform_response(
        &self,
        body: Value,
        descriptor: &ProviderDescriptor,
    ) -> Result<ProviderResponse, AdapterFailure> {
        transform::parse_chat_response(body, descriptor)
    }
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn invoke(
        &self,
        request: &NormalizedRequest,
        descriptor: &ProviderDescriptor,
        deadline: Instant,
    ) -> Result<ProviderResponse, AdapterFailure> {
        invoke_wire(self, self.transport.as_ref(), request, descriptor, deadline).await
    }
}
