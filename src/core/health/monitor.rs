//! Health monitor implementation
//!
//! This module provides the main HealthMonitor struct and its core methods
//! for recording outcomes and reading provider health.

use super::record::HealthRecord;
use super::types::{HealthSnapshot, HealthStatus, Outcome};
use crate::config::HealthMonitorConfig;
use crate::core::providers::unified_provider::ProviderError;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Health monitor for tracking provider health
///
/// Records live in a concurrent map; each record has its own lock, so updates for
/// different providers never contend.
pub struct HealthMonitor {
    pub(crate) config: HealthMonitorConfig,
    pub(crate) records: DashMap<String, Arc<Mutex<HealthRecord>>>,
    pub(crate) probe_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("config", &self.config)
            .field("providers", &self.records.len())
            .finish()
    }
}

impl HealthMonitor {
    /// Create a new health monitor
    pub fn new(config: HealthMonitorConfig) -> Self {
        Self {
            config,
            records: DashMap::new(),
            probe_tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &HealthMonitorConfig {
        &self.config
    }

    /// Get or lazily create a provider's record
    fn record_for(&self, provider_id: &str) -> Arc<Mutex<HealthRecord>> {
        if let Some(record) = self.records.get(provider_id) {
            return record.value().clone();
        }
        self.records
            .entry(provider_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(HealthRecord::new(provider_id))))
            .value()
            .clone()
    }

    /// Record an observed outcome
    ///
    /// Caller-fault failures are ignored. Returns the provider's status afterwards.
    pub fn record(&self, provider_id: &str, outcome: Outcome) -> HealthStatus {
        if !outcome.counts_against_provider() {
            debug!(
                provider = provider_id,
                kind = ?outcome.error,
                "caller-fault outcome not recorded against provider"
            );
            return self.status(provider_id);
        }

        let record = self.record_for(provider_id);
        let mut record = record.lock();
        let previous = record.status();
        let current = record.apply(&outcome, &self.config, Instant::now());
        drop(record);

        if previous != current {
            match current {
                HealthStatus::Healthy => info!(provider = provider_id, from = %previous, "provider recovered"),
                HealthStatus::Degraded => warn!(provider = provider_id, from = %previous, "provider degraded"),
                HealthStatus::Unavailable => warn!(
                    provider = provider_id,
                    from = %previous,
                    error = outcome.message.as_deref().unwrap_or("unknown"),
                    "provider marked unavailable"
                ),
            }
        }
        current
    }

    /// Passive signal from a completed call
    pub fn record_outcome(&self, provider_id: &str, success: bool, latency: Duration) -> HealthStatus {
        let outcome = if success {
            Outcome::success(latency)
        } else {
            Outcome {
                success: false,
                ..Outcome::success(latency)
            }
        };
        self.record(provider_id, outcome)
    }

    /// Record a failed call with its error
    pub fn record_error(&self, provider_id: &str, error: &ProviderError, latency: Duration) -> HealthStatus {
        self.record(provider_id, Outcome::from_error(error, latency))
    }

    /// Whether the router may select the provider right now
    pub fn is_eligible(&self, provider_id: &str) -> bool {
        match self.records.get(provider_id) {
            Some(record) => record.value().lock().is_eligible(Instant::now()),
            None => true,
        }
    }

    pub fn status(&self, provider_id: &str) -> HealthStatus {
        self.records
            .get(provider_id)
            .map(|record| record.value().lock().status())
            .unwrap_or(HealthStatus::Healthy)
    }

    /// Snapshot for one provider; unobserved providers are healthy
    pub fn provider_health(&self, provider_id: &str) -> HealthSnapshot {
        let record = self.records.get(provider_id).map(|r| r.value().clone());
        match record {
            Some(record) => record.lock().snapshot(&self.config, Instant::now()),
            None => HealthSnapshot::unobserved(provider_id),
        }
    }

    /// Snapshots of every observed provider
    pub fn snapshot(&self) -> BTreeMap<String, HealthSnapshot> {
        let records: Vec<(String, Arc<Mutex<HealthRecord>>)> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let now = Instant::now();
        records
            .into_iter()
            .map(|(id, record)| {
                let snapshot = record.lock().snapshot(&self.config, now);
                (id, snapshot)
            })
            .collect()
    }

    /// Drop records for providers not in `keep`
    pub fn retain_providers(&self, keep: &[String]) {
        self.records.retain(|id, _| keep.contains(id));
    }
}
