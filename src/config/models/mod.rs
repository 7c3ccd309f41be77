//! Configuration data models
//!
//! This module defines all configuration structures used by the orchestrator.

#![allow(missing_docs)]

pub mod cost;
pub mod health;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod router;

// Re-export all configuration types
pub use cost::*;
pub use health::*;
pub use http::*;
pub use orchestrator::*;
pub use provider::*;
pub use router::*;

use crate::core::types::Capability;

/// Default values for configuration
pub fn default_true() -> bool {
    true
}

pub fn default_capabilities() -> Vec<Capability> {
    vec![Capability::chat()]
}

/// Default provider priority
pub fn default_priority() -> u32 {
    100
}

pub fn default_unavailable_after() -> u32 {
    3
}

pub fn default_recover_after() -> u32 {
    2
}

pub fn default_degraded_failure_rate() -> f64 {
    0.5
}

pub fn default_min_samples() -> u32 {
    5
}

pub fn default_window_size() -> usize {
    20
}

/// Default window age in seconds (5 minutes)
pub fn default_window_secs() -> u64 {
    300
}

pub fn default_probe_interval_secs() -> u64 {
    45
}

pub fn default_probe_timeout_secs() -> u64 {
    10
}

pub fn default_backoff_base_ms() -> u64 {
    1_000
}

pub fn default_backoff_max_ms() -> u64 {
    60_000
}

pub fn default_retry_after_max_secs() -> u64 {
    3600
}

/// Default overall deadline (30 seconds)
pub fn default_deadline_ms() -> u64 {
    30_000
}

pub fn default_attempt_timeout_fraction() -> f64 {
    0.5
}

pub fn default_min_attempt_timeout_ms() -> u64 {
    2_000
}

pub fn default_chars_per_token() -> f64 {
    4.0
}

pub fn default_output_tokens() -> u32 {
    256
}

pub fn default_connect_timeout_secs() -> u64 {
    10
}

pub fn default_pool_idle_timeout_secs() -> u64 {
    90
}

pub fn default_pool_max_idle_per_host() -> usize {
    80
}

pub fn default_user_agent() -> String {
    format!("ai-orchestrator/{}", env!("CARGO_PKG_VERSION"))
}
