//! Mapping of provider failures onto the shared error taxonomy
//!
//! Every adapter family implements [`ErrorMapper`]. The defaults cover the status
//! conventions the hosted APIs share; families override [`ErrorMapper::extract_message`]
//! or [`ErrorMapper::map_http_error`] when their error bodies differ.

use super::transport::TransportError;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::Capability;
use serde_json::Value;

const MAX_MESSAGE_CHARS: usize = 300;

/// Phrases providers use when the prompt exceeds the model's context window
const CONTEXT_LENGTH_MARKERS: [&str; 5] = [
    "context_length_exceeded",
    "maximum context length",
    "prompt is too long",
    "too many tokens",
    "exceeds the context window",
];

pub trait ErrorMapper: Send + Sync {
    /// Adapter family name used in errors
    fn provider_name(&self) -> &'static str;

    /// Map a non-2xx HTTP reply
    fn map_http_error(&self, status: u16, body: &str, retry_after: Option<u64>) -> ProviderError {
        map_status_code(
            self.provider_name(),
            status,
            body,
            self.extract_message(body),
            retry_after,
        )
    }

    /// Pull a human-readable message out of an error body
    fn extract_message(&self, body: &str) -> String {
        let extracted = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            json.pointer("/error/message")
                .or_else(|| json.get("message"))
                .or_else(|| json.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

        let message = extracted.unwrap_or_else(|| body.trim().to_string());
        if message.is_empty() {
            "no error details".to_string()
        } else {
            truncate(&message, MAX_MESSAGE_CHARS)
        }
    }

    /// Map a failure below HTTP
    fn map_transport_error(&self, error: TransportError) -> ProviderError {
        let provider = self.provider_name();
        match error {
            TransportError::Timeout => ProviderError::timeout(provider, "request timed out"),
            TransportError::Connect(message) => ProviderError::provider_unavailable(provider, message),
            TransportError::Other(message) => ProviderError::provider_unavailable(provider, message),
        }
    }
}

/// Status conventions shared by the hosted APIs
pub fn map_status_code(
    provider: &'static str,
    status: u16,
    body: &str,
    message: String,
    retry_after: Option<u64>,
) -> ProviderError {
    match status {
        400 | 422 if is_context_length_error(body) => {
            ProviderError::unsupported_capability(provider, Capability::LONG_CONTEXT)
        }
        400 | 422 => ProviderError::invalid_request(provider, message),
        401 | 403 => ProviderError::authentication(provider, message),
        404 => ProviderError::provider_unavailable(
            provider,
            format!("model or endpoint not found: {}", message),
        ),
        408 | 504 => ProviderError::timeout(provider, message),
        413 => ProviderError::unsupported_capability(provider, Capability::LONG_CONTEXT),
        429 => ProviderError::rate_limit_with_message(provider, message, retry_after),
        500..=599 => {
            ProviderError::provider_unavailable(provider, format!("HTTP {}: {}", status, message))
        }
        _ => ProviderError::provider_unavailable(
            provider,
            format!("unexpected HTTP {}: {}", status, message),
        ),
    }
}

pub fn is_context_length_error(body: &str) -> bool {
    let lowered = body.to_lowercase();
    CONTEXT_LENGTH_MARKERS.iter().any(|m| lowered.contains(m))
}

fn truncate(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        message.to_string()
    } else {
        let mut truncated: String = message.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}
