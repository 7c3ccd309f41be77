//! Orchestrator facade
//!
//! Single entry point that wires the provider registry, health monitor, cost tracker and
//! router together. The registry sits behind an [`ArcSwap`] so a reload never blocks
//! calls in flight; each call routes against the registry it started with.

use crate::config::{Config, Validate};
use crate::core::cost::CostTracker;
use crate::core::health::{HealthMonitor, HealthSnapshot};
use crate::core::providers::base::transport::{HttpTransport, ReqwestTransport};
use crate::core::providers::provider_registry::ProviderRegistry;
use crate::core::router::{AggregateError, ExhaustionReason, RouteTrace, Router, RoutingPolicy};
use crate::core::types::{CallResult, NormalizedRequest};
use crate::utils::error::{OrchestratorError, Result};
use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

/// Multi-provider completion orchestrator
pub struct Orchestrator {
    registry: ArcSwap<ProviderRegistry>,
    transport: Option<Arc<dyn HttpTransport>>,
    router: Router,
    health: Arc<HealthMonitor>,
    cost: Arc<CostTracker>,
    probes_enabled: bool,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("providers", &self.registry.load().ids())
            .field("router", &self.router)
            .finish()
    }
}

impl Orchestrator {
    /// Build an orchestrator from configuration, with a pooled HTTP transport
    pub fn new(config: &Config) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(
            ReqwestTransport::new(config.http())
                .map_err(|e| OrchestratorError::config(format!("HTTP client: {}", e)))?,
        );
        Self::with_transport(config, transport)
    }

    /// Build an orchestrator whose adapters share `transport`
    pub fn with_transport(config: &Config, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        let registry = ProviderRegistry::from_config(config.providers(), transport.clone())?;
        let mut orchestrator = Self::with_registry(config, registry)?;
        orchestrator.transport = Some(transport);
        Ok(orchestrator)
    }

    /// Build an orchestrator around an explicit registry
    ///
    /// Provider entries in `config` are ignored; router, health and cost settings apply
    /// and are validated.
    pub fn with_registry(config: &Config, registry: ProviderRegistry) -> Result<Self> {
        config.orchestrator.router.validate().map_err(OrchestratorError::validation)?;
        config.orchestrator.health.validate().map_err(OrchestratorError::validation)?;
        config.orchestrator.cost.validate().map_err(OrchestratorError::validation)?;

        let health = Arc::new(HealthMonitor::new(config.health().clone()));
        let cost = Arc::new(CostTracker::new(config.cost().clone()));
        cost.load_rates(&registry);
        let router = Router::new(config.router().clone(), health.clone(), cost.clone());

        info!(providers = registry.len(), "orchestrator initialized");
        Ok(Self {
            registry: ArcSwap::from_pointee(registry),
            transport: None,
            router,
            health,
            cost,
            probes_enabled: config.health().probes_enabled,
        })
    }

    /// Complete a request
    ///
    /// The whole routed call runs under one deadline; when it expires the call in
    /// flight is dropped and reported as a timeout.
    pub async fn complete(
        &self,
        request: &NormalizedRequest,
        policy: &RoutingPolicy,
    ) -> std::result::Result<CallResult, AggregateError> {
        let registry = self.registry.load_full();
        let correlation_id = request.correlation_id();
        let timeout = self.router.call_timeout(request, policy);
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now);
        let mut trace = RouteTrace::new(correlation_id);

        let span = info_span!("complete", correlation_id = %correlation_id);
        let outcome = tokio::time::timeout_at(
            deadline,
            self.router
                .route(&registry, request, policy, deadline, &mut trace)
                .instrument(span),
        )
        .await;

        match outcome {
            Ok(result) => result,
            Err(_) => {
                if let Some((provider, error, latency)) = trace.cancel_in_flight() {
                    self.health.record_error(&provider, &error, latency);
                }
                warn!(
                    correlation_id = %correlation_id,
                    timeout_ms = timeout.as_millis() as u64,
                    attempts = trace.attempts.len(),
                    "call cancelled at deadline"
                );
                Err(
                    AggregateError::new(ExhaustionReason::DeadlineExceeded, trace.attempts, correlation_id)
                        .with_excluded(trace.excluded),
                )
            }
        }
    }

    /// Health snapshot of every registered provider
    pub fn provider_status(&self) -> BTreeMap<String, HealthSnapshot> {
        self.registry
            .load()
            .ids()
            .into_iter()
            .map(|id| {
                let snapshot = self.health.provider_health(&id);
                (id, snapshot)
            })
            .collect()
    }

    /// Probe every provider once and return the resulting snapshots
    pub async fn probe_all(&self) -> BTreeMap<String, HealthSnapshot> {
        let registry = self.registry.load_full();
        self.health.probe_all(&registry).await
    }

    /// Start background probes, if enabled in configuration
    pub fn start_probes(&self) {
        if !self.probes_enabled {
            debug!("health probes disabled");
            return;
        }
        self.health.start_probes(&self.registry.load());
    }

    /// Stop background probes
    pub fn shutdown(&self) {
        self.health.stop_probes();
        info!("orchestrator shut down");
    }

    /// Rebuild the registry from new configuration and swap it in
    ///
    /// Health records of providers that survive the reload are kept. Health thresholds
    /// are fixed at construction; router and cost settings are replaced.
    pub fn reload(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let transport: Arc<dyn HttpTransport> = match &self.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(
                ReqwestTransport::new(config.http())
                    .map_err(|e| OrchestratorError::config(format!("HTTP client: {}", e)))?,
            ),
        };
        let registry = ProviderRegistry::from_config(config.providers(), transport)?;
        self.reload_with_registry(config, registry);
        Ok(())
    }

    /// Swap in an explicit registry
    pub fn reload_with_registry(&self, config: &Config, registry: ProviderRegistry) {
        let probes_running = self.health.probe_task_count() > 0;

        self.health.retain_providers(&registry.ids());
        self.cost.set_config(config.cost().clone());
        self.cost.load_rates(&registry);
        self.router.set_config(config.router().clone());
        self.registry.store(Arc::new(registry));

        if probes_running {
            self.health.start_probes(&self.registry.load());
        }
        info!(providers = self.registry.load().len(), "configuration reloaded");
    }

    /// Cost & usage tracker
    pub fn usage(&self) -> &Arc<CostTracker> {
        &self.cost
    }

    pub fn health(&self) -> &Arc<HealthMonitor> {
        &self.health
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Registry currently used for new calls
    pub fn registry(&self) -> Arc<ProviderRegistry> {
        self.registry.load_full()
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.health.stop_probes();
    }
}
