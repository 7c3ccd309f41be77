//! Cost & usage tracker
//!
//! Prices calls from provider rate tables, appends them to the usage ledger and answers
//! spend and budget queries. Rate tables are swapped wholesale on configuration reload.

use super::calculator;
use super::ledger::{InMemoryLedger, UsageLedger};
use super::types::{CostError, CostResult, RateTable, UsageLedgerEntry};
use crate::config::CostConfig;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::provider_registry::ProviderRegistry;
use crate::core::types::{NormalizedRequest, Usage};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Tracks per-call cost and accumulated spend
pub struct CostTracker {
    config: ArcSwap<CostConfig>,
    rates: ArcSwap<HashMap<String, RateTable>>,
    ledger: Arc<dyn UsageLedger>,
}

impl std::fmt::Debug for CostTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostTracker")
            .field("providers", &self.rates.load().len())
            .field("ledger", &self.ledger)
            .finish()
    }
}

impl CostTracker {
    /// Tracker backed by an in-memory ledger
    pub fn new(config: CostConfig) -> Self {
        Self::with_ledger(config, Arc::new(InMemoryLedger::new()))
    }

    pub fn with_ledger(config: CostConfig, ledger: Arc<dyn UsageLedger>) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            rates: ArcSwap::from_pointee(HashMap::new()),
            ledger,
        }
    }

    /// Replace the rate tables with those of the registry's providers
    pub fn load_rates(&self, registry: &ProviderRegistry) {
        let rates: HashMap<String, RateTable> = registry
            .iter()
            .map(|p| (p.descriptor.name.clone(), p.descriptor.rates))
            .collect();
        debug!(providers = rates.len(), "loaded provider rate tables");
        self.rates.store(Arc::new(rates));
    }

    pub fn set_config(&self, config: CostConfig) {
        self.config.store(Arc::new(config));
    }

    pub fn config(&self) -> Arc<CostConfig> {
        self.config.load_full()
    }

    pub fn rates(&self, provider_id: &str) -> Option<RateTable> {
        self.rates.load().get(provider_id).copied()
    }

    /// Cost of `usage` on a provider
    pub fn estimate_cost(&self, provider_id: &str, usage: &Usage) -> CostResult<f64> {
        let rates = self.rates(provider_id).ok_or_else(|| CostError::UnknownProvider {
            provider: provider_id.to_string(),
        })?;
        Ok(calculator::estimate_cost(&rates, usage))
    }

    /// Pre-call estimate of a request on a provider
    pub fn estimate_request_cost(&self, descriptor: &ProviderDescriptor, request: &NormalizedRequest) -> f64 {
        calculator::estimate_request_cost(&descriptor.rates, request, &self.config.load())
    }

    /// Append an entry to the ledger
    pub fn record(&self, entry: UsageLedgerEntry) {
        debug!(
            provider = %entry.provider,
            correlation_id = %entry.correlation_id,
            cost = entry.estimated_cost,
            outcome = ?entry.outcome,
            "recorded usage"
        );
        self.ledger.append(entry);
    }

    /// Configured budget for a tenant
    pub fn tenant_budget(&self, tenant_id: &str) -> Option<f64> {
        self.config.load().tenant_budgets.get(tenant_id).copied()
    }

    /// Tenant spend within the billing window ending at `now`
    pub fn tenant_spend(&self, tenant_id: &str, now: DateTime<Utc>) -> f64 {
        let since = self
            .config
            .load()
            .billing_window()
            .and_then(|w| chrono::Duration::from_std(w).ok())
            .and_then(|w| now.checked_sub_signed(w));

        self.ledger.sum_cost(&|entry| {
            entry.tenant_id.as_deref() == Some(tenant_id)
                && since.is_none_or(|since| entry.timestamp >= since)
        })
    }

    /// Ceiling minus the tenant's spend in the billing window, never below zero
    pub fn remaining_budget(&self, tenant_id: &str, ceiling: f64) -> f64 {
        (ceiling - self.tenant_spend(tenant_id, Utc::now())).max(0.0)
    }

    pub fn total_cost(&self) -> f64 {
        self.ledger.sum_cost(&|_| true)
    }

    pub fn spend_by_provider(&self) -> BTreeMap<String, f64> {
        let mut spend = BTreeMap::new();
        for entry in self.ledger.entries() {
            *spend.entry(entry.provider).or_insert(0.0) += entry.estimated_cost;
        }
        spend
    }

    pub fn spend_by_tenant(&self) -> BTreeMap<String, f64> {
        let mut spend = BTreeMap::new();
        for entry in self.ledger.entries() {
            if let Some(tenant) = entry.tenant_id {
                *spend.entry(tenant).or_insert(0.0) += entry.estimated_cost;
            }
        }
        spend
    }

    /// Snapshot of every ledger entry in append order
    pub fn entries(&self) -> Vec<UsageLedgerEntry> {
        self.ledger.entries()
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }
}
