//! Router / failover engine
//!
//! Runs one logical call through the state machine in [`super::state`]: select the
//! ranked candidates, dispatch to the head, and on retryable failure advance to the next
//! candidate until one succeeds, a non-retryable failure occurs, or the deadline or
//! candidate list runs out.

use super::error::{AggregateError, Exclusion, ExhaustionReason};
use super::execution::{attempt_timeout, fallback_usage, overall_deadline, parse_structured};
use super::policy::RoutingPolicy;
use super::selection::Selection;
use super::state::{AttemptFailure, RouteState, RouteTrace};
use crate::config::RouterConfig;
use crate::core::cost::{CostTracker, LedgerOutcome, UsageLedgerEntry, estimate_cost};
use crate::core::health::{HealthMonitor, Outcome};
use crate::core::providers::provider_registry::ProviderRegistry;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::types::{CallResult, NormalizedRequest};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Health- and cost-aware router
pub struct Router {
    pub(crate) config: ArcSwap<RouterConfig>,
    pub(crate) health: Arc<HealthMonitor>,
    pub(crate) cost: Arc<CostTracker>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config.load())
            .finish()
    }
}

impl Router {
    pub fn new(config: RouterConfig, health: Arc<HealthMonitor>, cost: Arc<CostTracker>) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            health,
            cost,
        }
    }

    pub fn config(&self) -> Arc<RouterConfig> {
        self.config.load_full()
    }

    pub fn set_config(&self, config: RouterConfig) {
        self.config.store(Arc::new(config));
    }

    pub fn health(&self) -> &Arc<HealthMonitor> {
        &self.health
    }

    pub fn cost(&self) -> &Arc<CostTracker> {
        &self.cost
    }

    /// Overall time budget for a call
    pub fn call_timeout(&self, request: &NormalizedRequest, policy: &RoutingPolicy) -> Duration {
        overall_deadline(&self.config.load(), request, policy.deadline)
    }

    /// Route one logical call
    ///
    /// Progress is written to `trace` as it happens, so a caller that drops this future
    /// at the deadline can still report the attempts made.
    pub async fn route(
        &self,
        registry: &ProviderRegistry,
        request: &NormalizedRequest,
        policy: &RoutingPolicy,
        deadline: Instant,
        trace: &mut RouteTrace,
    ) -> Result<CallResult, AggregateError> {
        let started = Instant::now();
        let overall = deadline.saturating_duration_since(started);
        let config = self.config.load_full();
        let correlation_id = request.correlation_id();
        let tenant = policy.tenant_id.as_deref().or(request.tenant_id());

        trace.transition(RouteState::Selecting, None);
        let Selection {
            candidates,
            excluded,
        } = self.select_candidates(registry, request, policy);
        trace.excluded = excluded.clone();

        if candidates.is_empty() {
            return Err(exhausted(trace, ExhaustionReason::NoEligibleCandidates, excluded));
        }

        let total = candidates.len();
        for (index, provider) in candidates.iter().enumerate() {
            let now = Instant::now();
            if now >= deadline {
                return Err(exhausted(trace, ExhaustionReason::DeadlineExceeded, excluded));
            }

            let descriptor = &provider.descriptor;
            let id = descriptor.name.as_str();
            let budget = attempt_timeout(&config, overall, deadline - now, index + 1 == total);
            let attempt_deadline = now + budget;

            trace.begin_attempt(id);
            let call = provider.adapter.invoke(request, descriptor, attempt_deadline);
            let result = match tokio::time::timeout_at(attempt_deadline, call).await {
                Ok(result) => result,
                Err(_) => Err(AdapterFailure::from(ProviderError::timeout(
                    provider.adapter.name(),
                    format!("no response within {} ms", budget.as_millis()),
                ))),
            };
            let latency = now.elapsed();

            match result {
                Ok(response) => {
                    trace.in_flight = None;
                    self.health.record(id, Outcome::success(latency));

                    let usage = response
                        .usage
                        .unwrap_or_else(|| fallback_usage(request, &response.text, &self.cost.config()));
                    let cost = estimate_cost(&descriptor.rates, &usage);
                    self.cost.record(
                        UsageLedgerEntry::new(id, usage, cost, correlation_id).with_tenant(tenant),
                    );

                    trace.transition(RouteState::Succeeded, Some(id));
                    let structured = if request.json_output() {
                        parse_structured(&response.text)
                    } else {
                        None
                    };

                    debug!(
                        correlation_id = %correlation_id,
                        provider = id,
                        attempts = index + 1,
                        latency_ms = latency.as_millis() as u64,
                        cost,
                        "routed call succeeded"
                    );
                    return Ok(CallResult {
                        correlation_id,
                        provider: id.to_string(),
                        model: response.model,
                        text: response.text,
                        structured,
                        latency: started.elapsed(),
                        usage,
                        estimated_cost: cost,
                        attempts: (index + 1) as u32,
                        finish_reason: response.finish_reason,
                    });
                }
                Err(AdapterFailure {
                    error,
                    partial_usage,
                }) => {
                    self.health.record_error(id, &error, latency);
                    if let Some(usage) = partial_usage {
                        let cost = estimate_cost(&descriptor.rates, &usage);
                        self.cost.record(
                            UsageLedgerEntry::new(id, usage, cost, correlation_id)
                                .with_tenant(tenant)
                                .with_outcome(LedgerOutcome::FailedWithPartialUsage),
                        );
                    }

                    warn!(
                        correlation_id = %correlation_id,
                        provider = id,
                        kind = %error.kind(),
                        latency_ms = latency.as_millis() as u64,
                        "attempt failed: {}",
                        error
                    );
                    trace.fail_attempt(AttemptFailure::new(id, &error, latency).with_partial_usage(partial_usage));

                    if !error.is_retryable() {
                        return Err(exhausted(trace, ExhaustionReason::NonRetryable, excluded));
                    }
                    if index + 1 < total {
                        trace.transition(RouteState::Retrying, Some(id));
                    }
                }
            }
        }

        let reason = if Instant::now() >= deadline {
            ExhaustionReason::DeadlineExceeded
        } else {
            ExhaustionReason::CandidatesExhausted
        };
        Err(exhausted(trace, reason, excluded))
    }
}

fn exhausted(trace: &mut RouteTrace, reason: ExhaustionReason, excluded: Vec<Exclusion>) -> AggregateError {
    trace.transition(RouteState::Exhausted, None);
    warn!(
        correlation_id = %trace.correlation_id,
        attempts = trace.attempts.len(),
        excluded = excluded.len(),
        "routing exhausted: {}",
        reason
    );
    AggregateError::new(reason, trace.attempts.clone(), trace.correlation_id).with_excluded(excluded)
}
