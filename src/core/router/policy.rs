//! Routing policy
//!
//! Caller-side constraints layered over a request: which provider to try first, which
//! providers may be used at all, and spend and time limits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call routing constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// Provider tried first when eligible; overrides the request's provider hint
    #[serde(default)]
    pub preferred_provider: Option<String>,
    /// When non-empty, only these providers are candidates, tried in this order
    #[serde(default)]
    pub fallback_order: Vec<String>,
    /// Cost ceiling in USD for one call
    #[serde(default)]
    pub max_cost: Option<f64>,
    /// Cap on attempts for this call
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Tenant billed for the call; overrides the request's tenant
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Overall deadline; the request's own timeout takes precedence
    #[serde(default, with = "optional_millis")]
    pub deadline: Option<Duration>,
}

impl RoutingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefer(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = Some(provider.into());
        self
    }

    pub fn fallback_order<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_order = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_cost(mut self, ceiling: f64) -> Self {
        self.max_cost = Some(ceiling);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
