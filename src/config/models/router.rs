//! Router configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Deadline for a routed call when neither the request nor the policy sets one
    #[serde(default = "default_deadline_ms")]
    pub default_deadline_ms: u64,
    /// Share of the overall deadline one attempt may use
    #[serde(default = "default_attempt_timeout_fraction")]
    pub attempt_timeout_fraction: f64,
    /// Floor for a single attempt's timeout
    #[serde(default = "default_min_attempt_timeout_ms")]
    pub min_attempt_timeout_ms: u64,
    /// Global cap on attempts per call; unlimited when unset
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_deadline_ms: default_deadline_ms(),
            attempt_timeout_fraction: default_attempt_timeout_fraction(),
            min_attempt_timeout_ms: default_min_attempt_timeout_ms(),
            max_attempts: None,
        }
    }
}

impl RouterConfig {
    pub fn default_deadline(&self) -> Duration {
        Duration::from_millis(self.default_deadline_ms)
    }

    pub fn min_attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.min_attempt_timeout_ms)
    }
}
