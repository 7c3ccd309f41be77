//! Health-based ranking
//!
//! Orders candidate providers for the router using their configured priority and
//! recent health.

use super::monitor::HealthMonitor;
use crate::core::providers::descriptor::ProviderDescriptor;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

struct RankKey {
    priority: u32,
    success_rate: f64,
    latency: Duration,
}

impl HealthMonitor {
    /// Eligible candidates ordered by priority, then success rate (higher first),
    /// then mean latency (lower first), then name
    ///
    /// Providers without latency samples sort as if they had zero latency.
    pub fn rank(&self, candidates: Vec<Arc<ProviderDescriptor>>) -> Vec<Arc<ProviderDescriptor>> {
        let mut keyed: Vec<(RankKey, Arc<ProviderDescriptor>)> = candidates
            .into_iter()
            .filter(|d| self.is_eligible(&d.name))
            .map(|d| {
                let health = self.provider_health(&d.name);
                let key = RankKey {
                    priority: d.priority,
                    success_rate: health.success_rate,
                    latency: health
                        .avg_latency_ms
                        .map(Duration::from_millis)
                        .unwrap_or(Duration::ZERO),
                };
                (key, d)
            })
            .collect();

        keyed.sort_by(|(a, da), (b, db)| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| {
                    b.success_rate
                        .partial_cmp(&a.success_rate)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.latency.cmp(&b.latency))
                .then_with(|| da.name.cmp(&db.name))
        });

        keyed.into_iter().map(|(_, d)| d).collect()
    }
}
