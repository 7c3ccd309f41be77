//! Health status types and outcomes
//!
//! This module defines the health status levels and the outcome events that drive
//! every status change.

use crate::core::providers::unified_provider::{ErrorKind, ProviderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Health status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    /// Provider is fully operational
    Healthy,
    /// Provider works but fails often enough to be deprioritized
    Degraded,
    /// Provider is out of rotation until it recovers
    Unavailable,
}

impl HealthStatus {
    /// Check if the status allows requests
    pub fn allows_requests(&self) -> bool {
        !matches!(self, HealthStatus::Unavailable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Degraded => "DEGRADED",
            HealthStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an outcome was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    /// A routed call
    Live,
    /// A background or on-demand probe
    Probe,
}

/// One observed call outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub latency: Duration,
    /// Error kind for failures, when known
    pub error: Option<ErrorKind>,
    /// Provider-requested wait before the next call
    pub retry_after: Option<Duration>,
    pub message: Option<String>,
    pub source: OutcomeSource,
}

impl Outcome {
    pub fn success(latency: Duration) -> Self {
        Self {
            success: true,
            latency,
            error: None,
            retry_after: None,
            message: None,
            source: OutcomeSource::Live,
        }
    }

    pub fn failure(kind: ErrorKind, latency: Duration) -> Self {
        Self {
            success: false,
            latency,
            error: Some(kind),
            retry_after: None,
            message: None,
            source: OutcomeSource::Live,
        }
    }

    /// Failure outcome carrying the error's kind, message and retry hint
    pub fn from_error(error: &ProviderError, latency: Duration) -> Self {
        Self {
            success: false,
            latency,
            error: Some(error.kind()),
            retry_after: error.retry_after().map(Duration::from_secs),
            message: Some(error.to_string()),
            source: OutcomeSource::Live,
        }
    }

    /// Mark this outcome as coming from a probe
    pub fn from_probe(mut self) -> Self {
        self.source = OutcomeSource::Probe;
        self
    }

    /// Caller-fault failures say nothing about the provider
    pub fn counts_against_provider(&self) -> bool {
        !self.error.is_some_and(|kind| kind.is_caller_fault())
    }
}

/// Read-only view of one provider's health
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub provider_id: String,
    pub status: HealthStatus,
    /// Whether the router may select the provider right now
    pub eligible: bool,
    /// Success rate over the window; 1.0 with no samples
    pub success_rate: f64,
    /// Mean latency over the window
    pub avg_latency_ms: Option<u64>,
    pub samples: usize,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub last_probe: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_kind: Option<ErrorKind>,
    /// Remaining rate-limit cooldown
    pub cooldown_remaining_ms: Option<u64>,
}

impl HealthSnapshot {
    /// Snapshot for a provider that has never been observed
    pub fn unobserved(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            status: HealthStatus::Healthy,
            eligible: true,
            success_rate: 1.0,
            avg_latency_ms: None,
            samples: 0,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_probe: None,
            last_success: None,
            last_error: None,
            last_error_kind: None,
            cooldown_remaining_ms: None,
        }
    }
}
