//! Deadline-bounded request dispatch

use super::error_mapper::ErrorMapper;
use super::transport::HttpTransport;
use crate::core::providers::unified_provider::ProviderError;
use serde_json::Value;
use tokio::time::Instant;

/// POST `body` to `url` and return the parsed 2xx JSON body
///
/// The whole exchange is bounded by `deadline`; running past it is a timeout no
/// matter which stage was in flight.
pub async fn send_json<M>(
    transport: &dyn HttpTransport,
    mapper: &M,
    url: &str,
    headers: &[(String, String)],
    body: &Value,
    deadline: Instant,
) -> Result<Value, ProviderError>
where
    M: ErrorMapper + ?Sized,
{
    let provider = mapper.provider_name();
    if Instant::now() >= deadline {
        return Err(ProviderError::timeout(provider, "deadline elapsed before dispatch"));
    }

    let reply = tokio::time::timeout_at(deadline, transport.post_json(url, headers, body))
        .await
        .map_err(|_| ProviderError::timeout(provider, "deadline elapsed before the provider replied"))?
        .map_err(|e| mapper.map_transport_error(e))?;

    if !reply.is_success() {
        tracing::debug!(
            provider,
            status = reply.status,
            "provider returned error status"
        );
        return Err(mapper.map_http_error(reply.status, &reply.body, reply.retry_after));
    }

    serde_json::from_str(&reply.body).map_err(|e| ProviderError::response_parsing(provider, e.to_string()))
}

/// Header list with a JSON content type plus any configured extras
pub fn base_headers<'a, I>(extra: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    headers.extend(extra.into_iter().map(|(k, v)| (k.clone(), v.clone())));
    headers
}
