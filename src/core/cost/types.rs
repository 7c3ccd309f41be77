//! Cost and usage types
//!
//! Rate tables come from provider configuration; ledger entries are written once per
//! call and never mutated.

use crate::core::types::Usage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Provider pricing in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Input cost per 1K tokens
    pub input_cost_per_1k_tokens: f64,
    /// Output cost per 1K tokens
    pub output_cost_per_1k_tokens: f64,
    /// Flat cost per request
    pub cost_per_request: f64,
}

impl RateTable {
    pub fn new(input_cost_per_1k_tokens: f64, output_cost_per_1k_tokens: f64) -> Self {
        Self {
            input_cost_per_1k_tokens,
            output_cost_per_1k_tokens,
            cost_per_request: 0.0,
        }
    }

    pub fn with_cost_per_request(mut self, cost: f64) -> Self {
        self.cost_per_request = cost;
        self
    }

    pub fn is_free(&self) -> bool {
        self.input_cost_per_1k_tokens == 0.0
            && self.output_cost_per_1k_tokens == 0.0
            && self.cost_per_request == 0.0
    }
}

/// How the call behind a ledger entry ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOutcome {
    Succeeded,
    /// The provider failed but reported billable usage
    FailedWithPartialUsage,
}

/// One billable call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLedgerEntry {
    /// Provider id
    pub provider: String,
    pub tenant_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub units: Usage,
    /// Estimated cost in USD
    pub estimated_cost: f64,
    pub correlation_id: Uuid,
    pub outcome: LedgerOutcome,
}

impl UsageLedgerEntry {
    pub fn new(
        provider: impl Into<String>,
        units: Usage,
        estimated_cost: f64,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            provider: provider.into(),
            tenant_id: None,
            timestamp: Utc::now(),
            units,
            estimated_cost,
            correlation_id,
            outcome: LedgerOutcome::Succeeded,
        }
    }

    pub fn with_tenant(mut self, tenant_id: Option<impl Into<String>>) -> Self {
        self.tenant_id = tenant_id.map(Into::into);
        self
    }

    pub fn with_outcome(mut self, outcome: LedgerOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Cost calculation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    #[error("No rate table for provider: {provider}")]
    UnknownProvider { provider: String },
}

/// Result type for cost operations
pub type CostResult<T> = Result<T, CostError>;
