//! Cost tracking configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Characters per token for pre-call input estimates
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: f64,
    /// Output tokens assumed when a request sets no maximum
    #[serde(default = "default_output_tokens")]
    pub default_output_tokens: u32,
    /// Billing window for tenant budgets; all recorded spend counts when unset
    #[serde(default)]
    pub billing_window_secs: Option<u64>,
    /// Per-tenant spend budgets
    #[serde(default)]
    pub tenant_budgets: BTreeMap<String, f64>,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            chars_per_token: default_chars_per_token(),
            default_output_tokens: default_output_tokens(),
            billing_window_secs: None,
            tenant_budgets: BTreeMap::new(),
        }
    }
}

impl CostConfig {
    pub fn billing_window(&self) -> Option<Duration> {
        self.billing_window_secs.map(Duration::from_secs)
    }
}
