//! Scripted provider adapters

use ai_orchestrator::core::providers::ProviderDescriptor;
use ai_orchestrator::{AdapterFailure, NormalizedRequest, ProviderAdapter, ProviderError, Usage};
use ai_orchestrator::core::types::ProviderResponse;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// One scripted adapter reaction
#[derive(Debug, Clone)]
pub enum Step {
    Succeed,
    Fail(ProviderError),
    FailWithUsage(ProviderError, Usage),
    Reply(String),
}

/// Adapter that plays back a script, then repeats a default step
#[derive(Debug)]
pub struct StubAdapter {
    script: Mutex<VecDeque<Step>>,
    default: Step,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubAdapter {
    fn with_default(default: Step) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::with_default(Step::Succeed))
    }

    pub fn failing(error: ProviderError) -> Arc<Self> {
        Arc::new(Self::with_default(Step::Fail(error)))
    }

    /// Succeeds after `delay`
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::with_default(Step::Succeed)
        })
    }

    /// Plays `steps` once, then succeeds
    pub fn scripted(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        let adapter = Self::with_default(Step::Succeed);
        adapter.script.lock().extend(steps);
        Arc::new(adapter)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn invoke(
        &self,
        _request: &NormalizedRequest,
        descriptor: &ProviderDescriptor,
        _deadline: Instant,
    ) -> Result<ProviderResponse, AdapterFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        let reply = |text: String| ProviderResponse {
            text,
            model: descriptor.model.clone(),
            usage: Some(Usage::new(120, 40)),
            finish_reason: Some("stop".to_string()),
        };

        match step {
            Step::Succeed => Ok(reply(format!("ok from {}", descriptor.name))),
            Step::Reply(text) => Ok(reply(text)),
            Step::Fail(error) => Err(error.into()),
            Step::FailWithUsage(error, usage) => Err(AdapterFailure::with_usage(error, usage)),
        }
    }
}
