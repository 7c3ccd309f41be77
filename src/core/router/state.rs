//! Router state machine
//!
//! A routed call moves `Selecting -> Dispatching -> {Succeeded, Retrying, Exhausted}`;
//! `Retrying` leads back to `Dispatching` for the next candidate. The [`RouteTrace`]
//! records every transition and failed attempt so a caller that cancels the call can
//! still report what happened.

use super::error::Exclusion;
use crate::core::providers::unified_provider::{ErrorKind, ProviderError};
use crate::core::types::Usage;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Named router states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteState {
    Selecting,
    Dispatching,
    Succeeded,
    Retrying,
    Exhausted,
}

impl RouteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteState::Selecting => "SELECTING",
            RouteState::Dispatching => "DISPATCHING",
            RouteState::Succeeded => "SUCCEEDED",
            RouteState::Retrying => "RETRYING",
            RouteState::Exhausted => "EXHAUSTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteState::Succeeded | RouteState::Exhausted)
    }
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptFailure {
    /// Provider id
    pub provider: String,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(rename = "latency_ms", serialize_with = "millis")]
    pub latency: Duration,
    /// Usage the provider reported for the failed call
    pub partial_usage: Option<Usage>,
}

impl AttemptFailure {
    pub fn new(provider: impl Into<String>, error: &ProviderError, latency: Duration) -> Self {
        Self {
            provider: provider.into(),
            kind: error.kind(),
            message: error.to_string(),
            latency,
            partial_usage: None,
        }
    }

    pub fn with_partial_usage(mut self, usage: Option<Usage>) -> Self {
        self.partial_usage = usage;
        self
    }
}

fn millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

/// Record of one routed call's progress
#[derive(Debug, Clone)]
pub struct RouteTrace {
    pub correlation_id: Uuid,
    pub states: Vec<RouteState>,
    pub attempts: Vec<AttemptFailure>,
    /// Providers filtered out during selection
    pub excluded: Vec<Exclusion>,
    /// Provider currently being called and when the attempt started
    pub in_flight: Option<(String, Instant)>,
}

impl RouteTrace {
    pub fn new(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            states: Vec::new(),
            attempts: Vec::new(),
            excluded: Vec::new(),
            in_flight: None,
        }
    }

    pub fn state(&self) -> Option<RouteState> {
        self.states.last().copied()
    }

    pub(crate) fn transition(&mut self, state: RouteState, provider: Option<&str>) {
        tracing::debug!(
            correlation_id = %self.correlation_id,
            provider = provider.unwrap_or("-"),
            from = self.state().map(|s| s.as_str()).unwrap_or("START"),
            to = state.as_str(),
            "route transition"
        );
        self.states.push(state);
    }

    pub(crate) fn begin_attempt(&mut self, provider: &str) {
        self.transition(RouteState::Dispatching, Some(provider));
        self.in_flight = Some((provider.to_string(), Instant::now()));
    }

    pub(crate) fn fail_attempt(&mut self, failure: AttemptFailure) {
        self.in_flight = None;
        self.attempts.push(failure);
    }

    /// Close out an attempt that was cancelled by the overall deadline
    ///
    /// Returns the provider, the timeout error and the attempt latency so the caller can
    /// report the failure to the health monitor.
    pub fn cancel_in_flight(&mut self) -> Option<(String, ProviderError, Duration)> {
        let (provider, started) = self.in_flight.take()?;
        let error = ProviderError::timeout("router", "call cancelled at the overall deadline");
        let latency = started.elapsed();
        self.attempts
            .push(AttemptFailure::new(provider.clone(), &error, latency));
        Some((provider, error, latency))
    }
}
