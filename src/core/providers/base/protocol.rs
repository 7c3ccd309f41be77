//! Wire protocol plumbing shared by the HTTP adapter families

use super::dispatch::send_json;
use super::error_mapper::ErrorMapper;
use super::transport::HttpTransport;
use crate::core::providers::credentials::Secret;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::AdapterFailure;
use crate::core::types::{NormalizedRequest, ProviderResponse, Usage};
use serde_json::Value;
use tokio::time::Instant;

/// How one adapter family speaks to its API
pub trait WireProtocol: ErrorMapper {
    /// Full URL of the completion endpoint
    fn endpoint(&self, descriptor: &ProviderDescriptor) -> String;

    /// Request headers, including authentication
    fn headers(&self, descriptor: &ProviderDescriptor, secret: Option<&Secret>) -> Vec<(String, String)>;

    /// Normalized request to provider body
    fn transform_request(&self, request: &NormalizedRequest, descriptor: &ProviderDescriptor) -> Value;

    /// Provider body to normalized response
    fn transform_response(
        &self,
        body: Value,
        descriptor: &ProviderDescriptor,
    ) -> Result<ProviderResponse, AdapterFailure>;
}

/// Run one call through a wire protocol
///
/// Capability checks and credential resolution happen before any I/O.
pub async fn invoke_wire<P>(
    protocol: &P,
    transport: &dyn HttpTransport,
    request: &NormalizedRequest,
    descriptor: &ProviderDescriptor,
    deadline: Instant,
) -> Result<ProviderResponse, AdapterFailure>
where
    P: WireProtocol + ?Sized,
{
    let name = protocol.provider_name();
    descriptor.ensure_supports(name, request)?;
    let secret = descriptor.credential.resolve(name)?;

    let url = protocol.endpoint(descriptor);
    let headers = protocol.headers(descriptor, secret.as_ref());
    let body = protocol.transform_request(request, descriptor);

    tracing::trace!(
        provider = %descriptor.name,
        adapter = name,
        correlation_id = %request.correlation_id(),
        "dispatching request"
    );

    let response = send_json(transport, protocol, &url, &headers, &body, deadline).await?;
    protocol.transform_response(response, descriptor)
}

/// Read a token count that may be absent or null
pub fn token_count(value: &Value, pointer: &str) -> Option<u32> {
    value
        .pointer(pointer)
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Usage from two token-count pointers; `None` when the provider reported neither
pub fn usage_from(value: &Value, input: &str, output: &str) -> Option<Usage> {
    match (token_count(value, input), token_count(value, output)) {
        (None, None) => None,
        (i, o) => Some(Usage::new(i.unwrap_or(0), o.unwrap_or(0))),
    }
}
