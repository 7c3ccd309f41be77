//! Candidate selection
//!
//! Filters the registry down to providers that can serve a request (capabilities),
//! afford it (cost ceiling) and are allowed to (health), then orders them.

use super::error::{Exclusion, ExclusionReason};
use super::policy::RoutingPolicy;
use super::router::Router;
use crate::core::providers::provider_registry::{ProviderRegistry, RegisteredProvider};
use crate::core::types::NormalizedRequest;
use tracing::debug;

/// Ordered candidates plus the providers filtered out on the way
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub candidates: Vec<RegisteredProvider>,
    pub excluded: Vec<Exclusion>,
}

impl Selection {
    pub fn candidate_ids(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|c| c.descriptor.name.as_str())
            .collect()
    }
}

impl Router {
    /// Tightest of the request ceiling, the policy ceiling and the tenant's remaining budget
    pub fn effective_ceiling(&self, request: &NormalizedRequest, policy: &RoutingPolicy) -> Option<f64> {
        let tenant = policy.tenant_id.as_deref().or(request.tenant_id());
        let budget = tenant.and_then(|tenant| {
            self.cost
                .tenant_budget(tenant)
                .map(|budget| self.cost.remaining_budget(tenant, budget))
        });

        [request.max_cost(), policy.max_cost, budget]
            .into_iter()
            .flatten()
            .reduce(f64::min)
    }

    /// Build the ranked candidate list for a request
    ///
    /// Without a fallback order every registered provider is considered and the health
    /// monitor ranks the survivors. With one, only the listed providers (plus the
    /// preferred provider) are considered, in the listed order. The preferred provider,
    /// if it survives filtering, always goes first.
    pub fn select_candidates(
        &self,
        registry: &ProviderRegistry,
        request: &NormalizedRequest,
        policy: &RoutingPolicy,
    ) -> Selection {
        let preferred = policy
            .preferred_provider
            .as_deref()
            .or(request.provider_hint());
        let ceiling = self.effective_ceiling(request, policy);

        let pool: Vec<&RegisteredProvider> = if policy.fallback_order.is_empty() {
            registry.iter().collect()
        } else {
            let mut ids: Vec<&str> = preferred.into_iter().collect();
            for id in &policy.fallback_order {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
            ids.into_iter()
                .filter_map(|id| {
                    let provider = registry.get(id);
                    if provider.is_none() {
                        debug!(provider = id, "fallback provider not registered");
                    }
                    provider
                })
                .collect()
        };

        let mut selection = Selection::default();
        let mut survivors = Vec::with_capacity(pool.len());
        for provider in pool {
            let descriptor = &provider.descriptor;
            let reason = if !descriptor.supports(request.required_capabilities()) {
                Some(ExclusionReason::MissingCapability)
            } else if ceiling.is_some_and(|c| self.cost.estimate_request_cost(descriptor, request) > c) {
                Some(ExclusionReason::OverCostCeiling)
            } else if !self.health.is_eligible(&descriptor.name) {
                Some(ExclusionReason::Ineligible)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    debug!(
                        correlation_id = %request.correlation_id(),
                        provider = %descriptor.name,
                        reason = ?reason,
                        "provider excluded"
                    );
                    selection.excluded.push(Exclusion {
                        provider: descriptor.name.clone(),
                        reason,
                    });
                }
                None => survivors.push(provider.clone()),
            }
        }

        let mut candidates: Vec<RegisteredProvider> = if policy.fallback_order.is_empty() {
            let ranked = self
                .health
                .rank(survivors.iter().map(|p| p.descriptor.clone()).collect());
            ranked
                .iter()
                .filter_map(|d| survivors.iter().find(|p| p.descriptor.name == d.name).cloned())
                .collect()
        } else {
            survivors
        };

        let preferred_position =
            preferred.and_then(|id| candidates.iter().position(|c| c.descriptor.name == id));
        if let Some(position) = preferred_position {
            let head = candidates.remove(position);
            candidates.insert(0, head);
        }

        if let Some(limit) = policy.max_attempts.or(self.config.load().max_attempts) {
            candidates.truncate(limit as usize);
        }

        selection.candidates = candidates;
        selection
    }
}
