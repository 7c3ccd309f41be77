//! Health monitor configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMonitorConfig {
    /// Consecutive failures before a provider is marked unavailable
    #[serde(default = "default_unavailable_after")]
    pub unavailable_after: u32,
    /// Consecutive successes needed to recover to healthy
    #[serde(default = "default_recover_after")]
    pub recover_after: u32,
    /// Window failure rate above which a provider is degraded
    #[serde(default = "default_degraded_failure_rate")]
    pub degraded_failure_rate: f64,
    /// Minimum outcomes in the window before degraded can be declared
    #[serde(default = "default_min_samples")]
    pub min_samples: u32,
    /// Maximum outcomes kept in the window
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Maximum age of outcomes kept in the window
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Interval between probes
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Timeout for a single probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Whether background probes run
    #[serde(default = "default_true")]
    pub probes_enabled: bool,
    /// First rate-limit cooldown when the provider gives no retry-after
    #[serde(default = "default_backoff_base_ms")]
    pub rate_limit_backoff_base_ms: u64,
    /// Cooldown cap
    #[serde(default = "default_backoff_max_ms")]
    pub rate_limit_backoff_max_ms: u64,
    /// Longest provider-requested retry-after honored as a cooldown
    #[serde(default = "default_retry_after_max_secs")]
    pub rate_limit_retry_after_max_secs: u64,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            unavailable_after: default_unavailable_after(),
            recover_after: default_recover_after(),
            degraded_failure_rate: default_degraded_failure_rate(),
            min_samples: default_min_samples(),
            window_size: default_window_size(),
            window_secs: default_window_secs(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            probes_enabled: true,
            rate_limit_backoff_base_ms: default_backoff_base_ms(),
            rate_limit_backoff_max_ms: default_backoff_max_ms(),
            rate_limit_retry_after_max_secs: default_retry_after_max_secs(),
        }
    }
}

impl HealthMonitorConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Cooldown for a provider-requested retry-after, capped
    pub fn retry_after_cooldown(&self, retry_after: Duration) -> Duration {
        retry_after.min(Duration::from_secs(self.rate_limit_retry_after_max_secs))
    }

    /// Cooldown after the k-th consecutive rate-limit signal: base × 2^(k−1), capped
    pub fn rate_limit_backoff(&self, consecutive: u32) -> Duration {
        let exponent = consecutive.saturating_sub(1).min(31);
        let millis = self
            .rate_limit_backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(self.rate_limit_backoff_max_ms);
        Duration::from_millis(millis)
    }
}
