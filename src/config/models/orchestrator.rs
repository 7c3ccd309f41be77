//! Top-level orchestrator configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Configured providers
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub health: HealthMonitorConfig,
    #[serde(default)]
    pub cost: CostConfig,
    #[serde(default)]
    pub http: HttpConfig,
}
