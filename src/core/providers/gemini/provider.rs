//! Gemini adapter

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;

use super::PROVIDER_NAME;
use super::transform;
use crate::core::providers::base::error_mapper::map_status_code;
use crate::core::providers::base::{ErrorMapper, HttpTransport, WireProtocol, base_headers, invoke_wire};
use crate::core::providers::credentials::Secret;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{NormalizedRequest, ProviderResponse};

#[derive(Clone)]
pub struct GeminiAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl GeminiAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter").finish_non_exhaustive()
    }
}

impl ErrorMapper for GeminiAdapter {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// Gemini reports a bad key as 400 INVALID_ARGUMENT with reason API_KEY_INVALID
    fn map_http_error(&self, status: u16, body: &str, retry_after: Option<u64>) -> ProviderError {
        let message = self.extract_message(body);
        if status == 400 && body.contains("API_KEY_INVALID") {
            return ProviderError::authentication(PROVIDER_NAME, message);
        }
        map_status_code(PROVIDER_NAME, status, body, message, retry_after)
    }
}

impl WireProtocol for GeminiAdapter {
    fn endpoint(&self, descriptor: &ProviderDescriptor) -> String {
        transform::generate_url(descriptor)
    }

    fn headers(&self, descriptor: &ProviderDescriptor, secret: Option<&Secret>) -> Vec<(String, String)> {
        let mut headers = base_headers(&descriptor.headers);
        if let Some(secret) = secret {
            headers.push(("x-goog-api-key".to_string(), secret.expose().to_string()));
        }
        headers
    }

    fn transform_request(&self, request: &NormalizedRequest, _descriptor: &ProviderDescriptor) -> Value {
        transform::build_generate_body(request)
    }

    fn transform_response(
        &self,
        body: Value,
        descriptor: &ProviderDescriptor,
    ) -> Result<ProviderResponse, AdapterFailure> {
        transform::parse_generate_response(body, descriptor)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
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
