//! Active health probing
//!
//! One background task per provider calls the adapter's probe on a fixed interval
//! and publishes the result through the same path as live call outcomes.

use super::monitor::HealthMonitor;
use super::types::{HealthSnapshot, Outcome};
use crate::core::providers::provider_registry::{ProviderRegistry, RegisteredProvider};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

impl HealthMonitor {
    /// Probe one provider once and record the outcome
    pub async fn probe_provider(&self, provider: &RegisteredProvider) -> HealthSnapshot {
        let id = provider.descriptor.name.as_str();
        let started = Instant::now();
        let deadline = started + self.config.probe_timeout();

        let result = tokio::time::timeout_at(deadline, provider.adapter.probe(&provider.descriptor, deadline)).await;
        let latency = started.elapsed();

        let outcome = match result {
            Ok(Ok(())) => Outcome::success(latency),
            Ok(Err(error)) => Outcome::from_error(&error, latency),
            Err(_) => {
                let error = crate::core::providers::ProviderError::timeout(
                    provider.adapter.name(),
                    "health probe timed out",
                );
                Outcome::from_error(&error, latency)
            }
        };

        debug!(
            provider = id,
            success = outcome.success,
            latency_ms = latency.as_millis() as u64,
            "health probe completed"
        );
        self.record(id, outcome.from_probe());
        self.provider_health(id)
    }

    /// Probe every registered provider concurrently
    pub async fn probe_all(&self, registry: &ProviderRegistry) -> BTreeMap<String, HealthSnapshot> {
        let probes = registry.iter().map(|provider| self.probe_provider(provider));
        join_all(probes)
            .await
            .into_iter()
            .map(|snapshot| (snapshot.provider_id.clone(), snapshot))
            .collect()
    }

    /// Start one probe task per provider, replacing any running probes
    ///
    /// Tasks hold only a weak reference to the monitor and stop once it is dropped.
    pub fn start_probes(self: &Arc<Self>, registry: &ProviderRegistry) {
        self.stop_probes();

        let interval = self.config.probe_interval();
        let mut tasks = Vec::with_capacity(registry.len());
        for provider in registry.iter() {
            let monitor: Weak<Self> = Arc::downgrade(self);
            let provider = provider.clone();

            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    ticker.tick().await;
                    let Some(monitor) = monitor.upgrade() else {
                        break;
                    };
                    monitor.probe_provider(&provider).await;
                }
            }));
        }

        info!(
            providers = tasks.len(),
            interval_secs = interval.as_secs(),
            "started health probes"
        );
        *self.probe_tasks.lock() = tasks;
    }

    /// Stop all probe tasks
    pub fn stop_probes(&self) {
        let tasks = std::mem::take(&mut *self.probe_tasks.lock());
        if tasks.is_empty() {
            return;
        }
        for task in &tasks {
            task.abort();
        }
        info!(stopped = tasks.len(), "stopped health probes");
    }

    /// Number of running probe tasks
    pub fn probe_task_count(&self) -> usize {
        self.probe_tasks.lock().iter().filter(|t| !t.is_finished()).count()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        for task in self.probe_tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}
