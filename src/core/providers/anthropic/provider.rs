//! Anthropic adapter

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;

use super::transform;
use super::{DEFAULT_API_VERSION, PROVIDER_NAME};
use crate::core::providers::base::error_mapper::map_status_code;
use crate::core::providers::base::{ErrorMapper, HttpTransport, WireProtocol, base_headers, invoke_wire};
use crate::core::providers::credentials::Secret;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{NormalizedRequest, ProviderResponse};

#[derive(Clone)]
pub struct AnthropicAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl AnthropicAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl fmt::Debug for AnthropicAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicAdapter").finish_non_exhaustive()
    }
}

impl ErrorMapper for AnthropicAdapter {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// 529 is Anthropic's "overloaded", which behaves like a rate limit
    fn map_http_error(&self, status: u16, body: &str, retry_after: Option<u64>) -> ProviderError {
        let message = self.extract_message(body);
        match status {
            529 => ProviderError::rate_limit_with_message(PROVIDER_NAME, message, retry_after),
            _ => map_status_code(PROVIDER_NAME, status, body, message, retry_after),
        }
    }
}

impl WireProtocol for AnthropicAdapter {
    fn endpoint(&self, descriptor: &ProviderDescriptor) -> String {
        transform::messages_url(descriptor)
    }

    fn headers(&self, descriptor: &ProviderDescriptor, secret: Option<&Secret>) -> Vec<(String, String)> {
        let mut headers = base_headers(&descriptor.headers);
        headers.push((
            "anthropic-version".to_string(),
            descriptor
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        ));
        if let Some(secret) = secret {
            headers.push(("x-api-key".to_string(), secret.expose().to_string()));
        }
        headers
    }

    fn transform_request(&self, request: &NormalizedRequest, descriptor: &ProviderDescriptor) -> Value {
        transform::build_messages_body(request, descriptor)
    }

    fn transform_response(
        &self,
        body: Value,
        descriptor: &ProviderDescriptor,
    ) -> Result<ProviderResponse, AdapterFailure> {
        transform::parse_messages_response(body, descriptor)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
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
