//! OpenAI-compatible adapter

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

/// Adapter for every provider speaking the chat completions format
#[derive(Clone)]
pub struct OpenAICompatibleAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl OpenAICompatibleAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl fmt::Debug for OpenAICompatibleAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICompatibleAdapter").finish_non_exhaustive()
    }
}

impl ErrorMapper for OpenAICompatibleAdapter {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

impl WireProtocol for OpenAICompatibleAdapter {
    fn endpoint(&self, descriptor: &ProviderDescriptor) -> String {
        transform::chat_url(descriptor)
    }

    fn headers(&self, descriptor: &ProviderDescriptor, secret: Option<&Secret>) -> Vec<(String, String)> {
        let mut headers = base_headers(&descriptor.headers);
        if let Some(secret) = secret {
            headers.push(transform::auth_header(descriptor, secret));
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
impl ProviderAdapter for OpenAICompatibleAdapter {
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
