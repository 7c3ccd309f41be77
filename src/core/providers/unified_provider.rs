//! Unified Provider Error Handling
//!
//! Every adapter translates its transport and wire-level failures into a single
//! [`ProviderError`] type, so routing code never sees provider-specific error shapes.
//!
//! | Variant | Kind | Fail over to next provider |
//! |------|------|--------|
//! | UnsupportedCapability | `UnsupportedCapability` | Yes |
//! | Authentication | `AuthFailure` | Yes |
//! | RateLimit | `RateLimited` | Yes |
//! | Timeout | `Timeout` | Yes |
//! | ProviderUnavailable | `ProviderUnavailable` | Yes |
//! | InvalidRequest | `MalformedRequest` | No |
//!
//! ```rust
//! use ai_orchestrator::core::providers::unified_provider::{ErrorKind, ProviderError};
//!
//! let err = ProviderError::rate_limit("anthropic", Some(30));
//! assert_eq!(err.kind(), ErrorKind::RateLimited);
//! assert!(err.is_retryable());
//! assert_eq!(err.retry_after(), Some(30));
//! ```

use crate::core::types::Usage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error taxonomy shared by adapters, health tracking and the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request needs something this provider cannot do
    UnsupportedCapability,
    /// Credential rejected
    AuthFailure,
    /// Provider signaled throttling
    RateLimited,
    /// Deadline exceeded
    Timeout,
    /// Transport or upstream failure
    ProviderUnavailable,
    /// Caller error; no provider will accept it
    MalformedRequest,
}

impl ErrorKind {
    /// Whether the router may fail over to another candidate after this kind
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::MalformedRequest)
    }

    /// Whether the same provider could succeed on a later attempt without a config change
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::ProviderUnavailable
        )
    }

    /// Failures caused by the request rather than the provider
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            ErrorKind::MalformedRequest | ErrorKind::UnsupportedCapability
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedCapability => "unsupported_capability",
            ErrorKind::AuthFailure => "auth_failure",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ProviderUnavailable => "provider_unavailable",
            ErrorKind::MalformedRequest => "malformed_request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified provider error type - single error for all providers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Capability '{capability}' not supported by {provider}")]
    UnsupportedCapability {
        provider: &'static str,
        capability: String,
    },

    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("Provider {provider} is unavailable: {message}")]
    ProviderUnavailable {
        provider: &'static str,
        message: String,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Create unsupported capability error
    pub fn unsupported_capability(provider: &'static str, capability: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            provider,
            capability: capability.into(),
        }
    }

    /// Create authentication error
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider,
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create rate limit error with an upstream message
    pub fn rate_limit_with_message(
        provider: &'static str,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            provider,
            message: message.into(),
            retry_after,
        }
    }

    /// Create timeout error
    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    /// Create provider unavailable error
    pub fn provider_unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            message: message.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    /// Create a response parsing error
    ///
    /// A 2xx body we cannot read is the provider misbehaving, not the caller.
    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            message: format!("unreadable response: {}", message.into()),
        }
    }

    /// Get the adapter family that raised the error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::UnsupportedCapability { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::InvalidRequest { provider, .. } => provider,
        }
    }

    /// Get the taxonomy kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedCapability { .. } => ErrorKind::UnsupportedCapability,
            Self::Authentication { .. } => ErrorKind::AuthFailure,
            Self::RateLimit { .. } => ErrorKind::RateLimited,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
            Self::InvalidRequest { .. } => ErrorKind::MalformedRequest,
        }
    }

    /// Check if the router may fail over after this error
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Provider-requested delay in seconds before calling it again
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Adapter failure: the error plus any usage the provider billed for the failed call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct AdapterFailure {
    pub error: ProviderError,
    pub partial_usage: Option<Usage>,
}

impl AdapterFailure {
    pub fn with_usage(error: ProviderError, usage: Usage) -> Self {
        Self {
            error,
            partial_usage: Some(usage),
        }
    }
}

impl From<ProviderError> for AdapterFailure {
    fn from(error: ProviderError) -> Self {
        Self {
            error,
            partial_usage: None,
        }
    }
}
