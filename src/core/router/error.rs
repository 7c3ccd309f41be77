//! Router error types
//!
//! A routed call that produces no result ends in an [`AggregateError`]: why routing
//! stopped, every failed attempt in the order it was made, and which providers were
//! filtered out before dispatch.

use super::state::AttemptFailure;
use crate::core::providers::unified_provider::ErrorKind;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Why the router stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionReason {
    /// Every candidate was tried and failed
    CandidatesExhausted,
    /// A failure that no other provider can fix
    NonRetryable,
    /// The overall deadline passed
    DeadlineExceeded,
    /// Nothing survived candidate selection
    NoEligibleCandidates,
}

impl ExhaustionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExhaustionReason::CandidatesExhausted => "all candidates failed",
            ExhaustionReason::NonRetryable => "non-retryable failure",
            ExhaustionReason::DeadlineExceeded => "deadline exceeded",
            ExhaustionReason::NoEligibleCandidates => "no eligible candidates",
        }
    }
}

impl fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a registered provider was not a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingCapability,
    OverCostCeiling,
    Ineligible,
}

/// A provider filtered out during selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub provider: String,
    pub reason: ExclusionReason,
}

/// Terminal failure of a routed call
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{reason} after {} attempt(s){}", .attempts.len(), describe_attempts(.attempts))]
pub struct AggregateError {
    pub reason: ExhaustionReason,
    /// Failed attempts in dispatch order
    pub attempts: Vec<AttemptFailure>,
    /// Providers filtered out before dispatch
    pub excluded: Vec<Exclusion>,
    pub correlation_id: Uuid,
}

fn describe_attempts(attempts: &[AttemptFailure]) -> String {
    if attempts.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = attempts
        .iter()
        .map(|a| format!("{}: {}", a.provider, a.kind))
        .collect();
    format!(": {}", parts.join(", "))
}

impl AggregateError {
    pub fn new(reason: ExhaustionReason, attempts: Vec<AttemptFailure>, correlation_id: Uuid) -> Self {
        Self {
            reason,
            attempts,
            excluded: Vec::new(),
            correlation_id,
        }
    }

    pub fn with_excluded(mut self, excluded: Vec<Exclusion>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Terminal error kind of the call
    pub fn kind(&self) -> ErrorKind {
        match self.reason {
            ExhaustionReason::DeadlineExceeded => ErrorKind::Timeout,
            ExhaustionReason::NonRetryable | ExhaustionReason::CandidatesExhausted => self
                .attempts
                .last()
                .map(|a| a.kind)
                .unwrap_or(ErrorKind::ProviderUnavailable),
            ExhaustionReason::NoEligibleCandidates => {
                let capability_only = !self.excluded.is_empty()
                    && self
                        .excluded
                        .iter()
                        .all(|e| e.reason == ExclusionReason::MissingCapability);
                if capability_only {
                    ErrorKind::UnsupportedCapability
                } else {
                    ErrorKind::ProviderUnavailable
                }
            }
        }
    }

    /// Provider ids in the order they were tried
    pub fn tried_providers(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.provider.as_str()).collect()
    }

    pub fn last_attempt(&self) -> Option<&AttemptFailure> {
        self.attempts.last()
    }
}
