//! Health monitor integration tests

#[cfg(test)]
mod tests {
    use ai_orchestrator::core::health::{HealthMonitorConfig, Outcome};
    use ai_orchestrator::core::providers::{ProviderDescriptor, ProviderRegistry, ProviderType};
    use ai_orchestrator::core::types::ProviderResponse;
    use ai_orchestrator::{
        AdapterFailure, ErrorKind, HealthMonitor, HealthStatus, NormalizedRequest, ProviderAdapter,
        ProviderError,
    };
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    mock! {
        pub Adapter {}

        #[async_trait]
        impl ProviderAdapter for Adapter {
            fn name(&self) -> &'static str;
            async fn invoke(
                &self,
                request: &NormalizedRequest,
                descriptor: &ProviderDescriptor,
                deadline: Instant,
            ) -> Result<ProviderResponse, AdapterFailure>;
            async fn probe(&self, descriptor: &ProviderDescriptor, deadline: Instant) -> Result<(), ProviderError>;
        }
    }

    impl std::fmt::Debug for MockAdapter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("MockAdapter")
        }
    }

    const MS: Duration = Duration::from_millis(80);

    fn monitor() -> HealthMonitor {
        HealthMonitor::new(HealthMonitorConfig::default())
    }

    fn fail(monitor: &HealthMonitor, id: &str) -> HealthStatus {
        monitor.record(id, Outcome::failure(ErrorKind::ProviderUnavailable, MS))
    }

    fn succeed(monitor: &HealthMonitor, id: &str) -> HealthStatus {
        monitor.record(id, Outcome::success(MS))
    }

    #[test]
    fn test_degraded_on_high_failure_rate_without_streak() {
        let monitor = monitor();
        for success in [true, true, false, false, true, false] {
            monitor.record_outcome("p", success, MS);
        }
        // 3 of 6 failed: not above the threshold yet
        assert_eq!(monitor.status("p"), HealthStatus::Healthy);

        assert_eq!(fail(&monitor, "p"), HealthStatus::Degraded);
        assert!(monitor.is_eligible("p"));

        // One success keeps it degraded; the second meets the recovery streak
        assert_eq!(succeed(&monitor, "p"), HealthStatus::Degraded);
        assert_eq!(succeed(&monitor, "p"), HealthStatus::Healthy);
    }

    #[test]
    fn test_window_is_bounded_by_count() {
        let config = HealthMonitorConfig {
            window_size: 4,
            min_samples: 4,
            ..HealthMonitorConfig::default()
        };
        let monitor = HealthMonitor::new(config);

        fail(&monitor, "p");
        fail(&monitor, "p");
        succeed(&monitor, "p");
        assert_eq!(fail(&monitor, "p"), HealthStatus::Degraded);

        for _ in 0..4 {
            succeed(&monitor, "p");
        }
        let snapshot = monitor.provider_health("p");
        assert_eq!(snapshot.status, HealthStatus::Healthy);
        assert_eq!(snapshot.samples, 4);
        assert_eq!(snapshot.success_rate, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_is_bounded_by_age_but_streaks_are_not() {
        let monitor = monitor();
        fail(&monitor, "p");
        fail(&monitor, "p");

        tokio::time::advance(Duration::from_secs(301)).await;
        let snapshot = monitor.provider_health("p");
        assert_eq!(snapshot.samples, 0);
        assert_eq!(snapshot.consecutive_failures, 2);

        assert_eq!(fail(&monitor, "p"), HealthStatus::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_backoff_doubles() {
        let monitor = monitor();
        let limited = ProviderError::rate_limit("stub", None);

        monitor.record_error("p", &limited, MS);
        assert_eq!(monitor.provider_health("p").cooldown_remaining_ms, Some(1000));
        assert!(!monitor.is_eligible("p"));

        monitor.record_error("p", &limited, MS);
        assert_eq!(monitor.provider_health("p").cooldown_remaining_ms, Some(2000));

        tokio::time::advance(Duration::from_millis(2001)).await;
        assert!(monitor.is_eligible("p"));
        assert_eq!(monitor.status("p"), HealthStatus::Healthy);

        // Success resets the backoff
        succeed(&monitor, "p");
        monitor.record_error("p", &limited, MS);
        assert_eq!(monitor.provider_health("p").cooldown_remaining_ms, Some(1000));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let monitor = monitor();
        monitor.record_error("p", &ProviderError::rate_limit("stub", Some(30)), MS);
        let remaining = monitor.provider_health("p").cooldown_remaining_ms.unwrap();
        assert!(remaining > 29_000 && remaining <= 30_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_retry_after_is_capped() {
        let monitor = monitor();
        let status = monitor.record_error("p", &ProviderError::rate_limit("stub", Some(u64::MAX)), MS);
        assert_eq!(status, HealthStatus::Healthy);
        assert_eq!(monitor.provider_health("p").cooldown_remaining_ms, Some(3_600_000));

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(monitor.is_eligible("p"));
    }

    #[test]
    fn test_rank_skips_unavailable_and_orders_by_priority_then_success_rate() {
        let monitor = monitor();
        let candidates: Vec<Arc<ProviderDescriptor>> = [("a", 2), ("b", 1), ("c", 1), ("d", 1)]
            .into_iter()
            .map(|(name, priority)| {
                Arc::new(ProviderDescriptor::new(name, ProviderType::OpenAI, "m").with_priority(priority))
            })
            .collect();

        succeed(&monitor, "b");
        fail(&monitor, "b");
        succeed(&monitor, "c");
        for _ in 0..3 {
            fail(&monitor, "d");
        }

        let ranked: Vec<String> = monitor
            .rank(candidates)
            .into_iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(ranked, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_probe_outcomes_drive_recovery() {
        let mut adapter = MockAdapter::new();
        adapter.expect_name().return_const("mock");
        let mut seq = mockall::Sequence::new();
        adapter
            .expect_probe()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(ProviderError::provider_unavailable("mock", "503 Service Unavailable")));
        adapter
            .expect_probe()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        adapter.expect_invoke().never();

        let registry = ProviderRegistry::new()
            .with_provider(
                ProviderDescriptor::new("mocked", ProviderType::Anthropic, "claude"),
                Arc::new(adapter),
            )
            .unwrap();
        let monitor = monitor();

        for _ in 0..3 {
            monitor.probe_all(&registry).await;
        }
        let snapshot = monitor.provider_health("mocked");
        assert_eq!(snapshot.status, HealthStatus::Unavailable);
        assert!(snapshot.last_probe.is_some());
        assert_eq!(snapshot.last_error_kind, Some(ErrorKind::ProviderUnavailable));

        monitor.probe_all(&registry).await;
        let statuses = monitor.probe_all(&registry).await;
        assert_eq!(statuses["mocked"].status, HealthStatus::Healthy);
        // Recovery discards failures from before the outage
        assert_eq!(statuses["mocked"].success_rate, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_probe_counts_as_timeout() {
        let mut adapter = MockAdapter::new();
        adapter.expect_name().return_const("mock");
        adapter.expect_probe().returning(|_, _| Ok(()));

        #[derive(Debug)]
        struct Hanging;

        #[async_trait]
        impl ProviderAdapter for Hanging {
            fn name(&self) -> &'static str {
                "hanging"
            }

            async fn invoke(
                &self,
                _request: &NormalizedRequest,
                _descriptor: &ProviderDescriptor,
                _deadline: Instant,
            ) -> Result<ProviderResponse, AdapterFailure> {
                std::future::pending().await
            }
        }

        let registry = ProviderRegistry::new()
            .with_provider(ProviderDescriptor::new("hung", ProviderType::Ollama, "llama3"), Arc::new(Hanging))
            .unwrap()
            .with_provider(ProviderDescriptor::new("fine", ProviderType::Ollama, "llama3"), Arc::new(adapter))
            .unwrap();
        let monitor = monitor();

        let started = Instant::now();
        let statuses = monitor.probe_all(&registry).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(10) && elapsed < Duration::from_secs(11));
        assert_eq!(statuses["hung"].last_error_kind, Some(ErrorKind::Timeout));
        assert_eq!(statuses["hung"].consecutive_failures, 1);
        assert_eq!(statuses["fine"].consecutive_successes, 1);
    }
}
