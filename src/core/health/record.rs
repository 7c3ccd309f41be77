//! Per-provider health record
//!
//! A record keeps a bounded window of recent outcomes (last N, no older than T) plus
//! streak counters. Status is derived from the outcome stream only.

use super::types::{HealthSnapshot, HealthStatus, Outcome, OutcomeSource};
use crate::config::HealthMonitorConfig;
use crate::core::providers::unified_provider::ErrorKind;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Sample {
    at: Instant,
    success: bool,
    latency: Duration,
}

/// Rolling health record for one provider
#[derive(Debug, Clone)]
pub struct HealthRecord {
    provider_id: String,
    status: HealthStatus,
    window: VecDeque<Sample>,
    consecutive_failures: u32,
    consecutive_successes: u32,
    consecutive_rate_limits: u32,
    cooldown_until: Option<Instant>,
    last_probe: Option<DateTime<Utc>>,
    last_success: Option<DateTime<Utc>>,
    last_error: Option<String>,
    last_error_kind: Option<ErrorKind>,
}

impl HealthRecord {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            status: HealthStatus::Healthy,
            window: VecDeque::new(),
            consecutive_failures: 0,
            consecutive_successes: 0,
            consecutive_rate_limits: 0,
            cooldown_until: None,
            last_probe: None,
            last_success: None,
            last_error: None,
            last_error_kind: None,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    /// Fold one outcome into the record and return the resulting status
    pub fn apply(&mut self, outcome: &Outcome, config: &HealthMonitorConfig, now: Instant) -> HealthStatus {
        if outcome.source == OutcomeSource::Probe {
            self.last_probe = Some(Utc::now());
        }

        self.prune(config, now);
        self.window.push_back(Sample {
            at: now,
            success: outcome.success,
            latency: outcome.latency,
        });
        while self.window.len() > config.window_size {
            self.window.pop_front();
        }

        if outcome.success {
            self.consecutive_successes = self.consecutive_successes.saturating_add(1);
            self.consecutive_failures = 0;
            self.consecutive_rate_limits = 0;
            self.cooldown_until = None;
            self.last_success = Some(Utc::now());
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            self.consecutive_successes = 0;
            self.last_error = outcome.message.clone();
            self.last_error_kind = outcome.error;

            match outcome.error {
                // A rejected credential will not fix itself
                Some(ErrorKind::AuthFailure) => {
                    self.consecutive_failures = self.consecutive_failures.max(config.unavailable_after);
                }
                Some(ErrorKind::RateLimited) => {
                    self.consecutive_rate_limits = self.consecutive_rate_limits.saturating_add(1);
                    let cooldown = match outcome.retry_after {
                        Some(retry_after) => config.retry_after_cooldown(retry_after),
                        None => config.rate_limit_backoff(self.consecutive_rate_limits),
                    };
                    self.cooldown_until = now.checked_add(cooldown).or(self.cooldown_until);
                }
                _ => {}
            }
        }

        self.status = self.next_status(config);
        self.status
    }

    fn next_status(&mut self, config: &HealthMonitorConfig) -> HealthStatus {
        if self.consecutive_failures >= config.unavailable_after {
            return HealthStatus::Unavailable;
        }

        let recovered = self.consecutive_successes >= config.recover_after;
        match self.status {
            HealthStatus::Unavailable if recovered => {
                // Failures from before the outage no longer describe the provider
                let keep = self.consecutive_successes as usize;
                while self.window.len() > keep {
                    self.window.pop_front();
                }
                HealthStatus::Healthy
            }
            HealthStatus::Unavailable => HealthStatus::Unavailable,
            _ if self.is_degraded(config) => HealthStatus::Degraded,
            HealthStatus::Degraded if !recovered => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }

    fn is_degraded(&self, config: &HealthMonitorConfig) -> bool {
        self.window.len() >= config.min_samples as usize
            && 1.0 - self.success_rate() > config.degraded_failure_rate
    }

    fn prune(&mut self, config: &HealthMonitorConfig, now: Instant) {
        let window = config.window();
        while self
            .window
            .front()
            .is_some_and(|s| now.saturating_duration_since(s.at) > window)
        {
            self.window.pop_front();
        }
    }

    /// Whether the router may select this provider at `now`
    pub fn is_eligible(&self, now: Instant) -> bool {
        self.status.allows_requests() && self.cooldown_until.is_none_or(|until| now >= until)
    }

    /// Success rate over the window; 1.0 with no samples
    pub fn success_rate(&self) -> f64 {
        if self.window.is_empty() {
            return 1.0;
        }
        let successes = self.window.iter().filter(|s| s.success).count();
        successes as f64 / self.window.len() as f64
    }

    /// Mean latency over the window
    pub fn avg_latency(&self) -> Option<Duration> {
        if self.window.is_empty() {
            return None;
        }
        let total: Duration = self.window.iter().map(|s| s.latency).sum();
        Some(total / self.window.len() as u32)
    }

    pub fn snapshot(&mut self, config: &HealthMonitorConfig, now: Instant) -> HealthSnapshot {
        self.prune(config, now);
        HealthSnapshot {
            provider_id: self.provider_id.clone(),
            status: self.status,
            eligible: self.is_eligible(now),
            success_rate: self.success_rate(),
            avg_latency_ms: self.avg_latency().map(|d| d.as_millis() as u64),
            samples: self.window.len(),
            consecutive_failures: self.consecutive_failures,
            consecutive_successes: self.consecutive_successes,
            last_probe: self.last_probe,
            last_success: self.last_success,
            last_error: self.last_error.clone(),
            last_error_kind: self.last_error_kind,
            cooldown_remaining_ms: self
                .cooldown_until
                .filter(|until| *until > now)
                .map(|until| (until - now).as_millis() as u64),
        }
    }
}
