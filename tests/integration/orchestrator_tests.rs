//! Orchestrator integration tests
//!
//! Routing, failover, deadlines and accounting through the public facade.

#[cfg(test)]
mod tests {
    use crate::common::{RegistryBuilder, Step, StubAdapter, request};
    use ai_orchestrator::core::router::{ExclusionReason, ExhaustionReason};
    use ai_orchestrator::{
        Capability, Config, ErrorKind, HealthStatus, NormalizedRequest, Orchestrator, ProviderDescriptor,
        ProviderError, ProviderType, RateTable, RoutingPolicy, Usage,
    };
    use futures::future::join_all;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn orchestrator(registry: ai_orchestrator::ProviderRegistry) -> Orchestrator {
        Orchestrator::with_registry(&Config::default(), registry).unwrap()
    }

    /// One healthy provider within the ceiling always answers
    #[tokio::test]
    async fn test_single_healthy_provider_completes() {
        let stub = StubAdapter::succeeding();
        let orchestrator = orchestrator(RegistryBuilder::new().provider("only", 1, stub.clone()).build());

        let request = NormalizedRequest::builder()
            .user("summarize the quarterly risk register")
            .max_cost(1.0)
            .build()
            .unwrap();
        let result = orchestrator.complete(&request, &RoutingPolicy::new()).await.unwrap();

        assert_eq!(result.provider, "only");
        assert_eq!(result.model, "only-model");
        assert_eq!(result.text, "ok from only");
        assert_eq!(result.attempts, 1);
        assert_eq!(result.usage, Usage::new(120, 40));
        assert_eq!(result.correlation_id, request.correlation_id());
        assert_eq!(stub.calls(), 1);
    }

    /// Retryable failures everywhere: the error lists every candidate in ranked order
    #[tokio::test]
    async fn test_all_retryable_failures_are_aggregated_in_rank_order() {
        let third = StubAdapter::failing(ProviderError::rate_limit("stub", None));
        let first = StubAdapter::failing(ProviderError::provider_unavailable("stub", "502 Bad Gateway"));
        let second = StubAdapter::failing(ProviderError::timeout("stub", "read timed out"));
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("zeta", 3, third.clone())
                .provider("alpha", 1, first.clone())
                .provider("mid", 2, second.clone())
                .build(),
        );

        let err = orchestrator
            .complete(&request("hello"), &RoutingPolicy::new())
            .await
            .unwrap_err();

        assert_eq!(err.reason, ExhaustionReason::CandidatesExhausted);
        assert_eq!(err.tried_providers(), vec!["alpha", "mid", "zeta"]);
        let kinds: Vec<ErrorKind> = err.attempts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::ProviderUnavailable, ErrorKind::Timeout, ErrorKind::RateLimited]
        );
        assert_eq!((first.calls(), second.calls(), third.calls()), (1, 1, 1));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }

    /// A malformed request is never retried on another provider
    #[tokio::test]
    async fn test_malformed_request_short_circuits() {
        let first = StubAdapter::failing(ProviderError::invalid_request("stub", "messages: invalid role"));
        let second = StubAdapter::succeeding();
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("a", 1, first.clone())
                .provider("b", 2, second.clone())
                .build(),
        );

        let err = orchestrator
            .complete(&request("hello"), &RoutingPolicy::new())
            .await
            .unwrap_err();

        assert_eq!(err.reason, ExhaustionReason::NonRetryable);
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);
        assert_eq!(first.calls() + second.calls(), 1);
    }

    /// Three failed calls take a provider out; two successful probes bring it back
    #[tokio::test]
    async fn test_unavailable_after_three_failures_and_recovery() {
        let flaky = StubAdapter::scripted([
            Step::Fail(ProviderError::provider_unavailable("stub", "503")),
            Step::Fail(ProviderError::provider_unavailable("stub", "503")),
            Step::Fail(ProviderError::provider_unavailable("stub", "503")),
        ]);
        let orchestrator = orchestrator(RegistryBuilder::new().provider("flaky", 1, flaky.clone()).build());

        for _ in 0..3 {
            let _ = orchestrator.complete(&request("hello"), &RoutingPolicy::new()).await;
        }
        assert_eq!(orchestrator.provider_status()["flaky"].status, HealthStatus::Unavailable);

        // Out of rotation: no call reaches the adapter
        let err = orchestrator
            .complete(&request("hello"), &RoutingPolicy::new())
            .await
            .unwrap_err();
        assert_eq!(err.reason, ExhaustionReason::NoEligibleCandidates);
        assert_eq!(err.excluded[0].reason, ExclusionReason::Ineligible);
        assert_eq!(flaky.calls(), 3);

        orchestrator.probe_all().await;
        assert_eq!(orchestrator.provider_status()["flaky"].status, HealthStatus::Unavailable);
        orchestrator.probe_all().await;
        assert_eq!(orchestrator.provider_status()["flaky"].status, HealthStatus::Healthy);

        let result = orchestrator.complete(&request("hello"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!(result.provider, "flaky");
    }

    /// The cost ceiling removes an expensive provider even when it ranks first
    #[tokio::test]
    async fn test_cost_ceiling_excludes_top_priority_provider() {
        let premium = StubAdapter::succeeding();
        let budget = StubAdapter::succeeding();
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .priced("premium", 1, RateTable::new(15.0, 75.0), premium.clone())
                .priced("budget", 2, RateTable::new(0.15, 0.6), budget.clone())
                .build(),
        );

        let request = NormalizedRequest::builder()
            .user("classify this risk")
            .max_output_tokens(100)
            .max_cost(0.5)
            .build()
            .unwrap();
        let result = orchestrator.complete(&request, &RoutingPolicy::new()).await.unwrap();

        assert_eq!(result.provider, "budget");
        assert_eq!(premium.calls(), 0);
        // 120 input + 40 output tokens at budget rates
        assert!((result.estimated_cost - (0.12 * 0.15 + 0.04 * 0.6)).abs() < 1e-9);
    }

    /// Concurrent calls never lose ledger writes
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_completes_produce_one_ledger_entry_each() {
        let orchestrator = Arc::new(orchestrator(
            RegistryBuilder::new()
                .priced("a", 1, RateTable::new(1.0, 1.0), StubAdapter::succeeding())
                .priced("b", 2, RateTable::new(1.0, 1.0), StubAdapter::succeeding())
                .build(),
        ));

        let calls = (0..100).map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let request = NormalizedRequest::builder()
                    .user(format!("request {}", i))
                    .tenant(if i % 2 == 0 { "acme" } else { "globex" })
                    .build()
                    .unwrap();
                orchestrator.complete(&request, &RoutingPolicy::new()).await
            })
        });
        let results = join_all(calls).await;
        assert!(results.into_iter().all(|r| r.unwrap().is_ok()));

        let usage = orchestrator.usage();
        assert_eq!(usage.ledger_len(), 100);
        let by_tenant = usage.spend_by_tenant();
        assert!((by_tenant["acme"] - by_tenant["globex"]).abs() < 1e-9);
        assert!((usage.total_cost() - 100.0 * 0.16).abs() < 1e-6);
    }

    /// Concurrent calls to a single provider are all billed to it
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_completes_on_single_provider() {
        let only = StubAdapter::succeeding();
        let orchestrator = Arc::new(orchestrator(
            RegistryBuilder::new()
                .priced("only", 1, RateTable::new(1.0, 1.0), only.clone())
                .build(),
        ));

        let calls = (0..100).map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .complete(&request(&format!("request {}", i)), &RoutingPolicy::new())
                    .await
            })
        });
        let results = join_all(calls).await;
        assert!(results.into_iter().all(|r| r.unwrap().is_ok_and(|c| c.provider == "only")));

        let entries = orchestrator.usage().entries();
        assert_eq!(entries.len(), 100);
        assert!(entries.iter().all(|e| e.provider == "only"));
        assert_eq!(only.calls(), 100);
        assert_eq!(orchestrator.health().provider_health("only").samples, 20);
    }

    /// A short deadline cuts off a slow provider with a timeout
    #[tokio::test]
    async fn test_deadline_cancels_slow_provider() {
        let slow = StubAdapter::slow(Duration::from_millis(500));
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .descriptor(
                    ProviderDescriptor::new("slow", ProviderType::OpenAI, "slow-model")
                        .with_priority(1)
                        .with_capabilities([Capability::CHAT, Capability::VISION]),
                    slow.clone(),
                )
                .provider("text-only", 2, StubAdapter::succeeding())
                .build(),
        );

        let request = NormalizedRequest::builder()
            .user("describe the chart")
            .require(Capability::VISION)
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let started = Instant::now();
        let err = orchestrator
            .complete(&request, &RoutingPolicy::new())
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.tried_providers(), vec!["slow"]);
        assert!(elapsed >= Duration::from_millis(45), "returned early: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(300), "returned late: {:?}", elapsed);
        assert_eq!(slow.calls(), 1);

        assert_eq!(err.excluded.len(), 1);
        assert_eq!(err.excluded[0].provider, "text-only");
        assert_eq!(err.excluded[0].reason, ExclusionReason::MissingCapability);

        let health = orchestrator.health().provider_health("slow");
        assert_eq!(health.consecutive_failures, 1);
        assert_eq!(health.last_error_kind, Some(ErrorKind::Timeout));
    }

    /// Request timeouts beyond the supported maximum are rejected up front
    #[test]
    fn test_oversized_request_timeout_is_malformed() {
        let err = NormalizedRequest::builder()
            .user("hi")
            .timeout(Duration::MAX)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);
    }

    /// An unbounded policy deadline is capped instead of overflowing
    #[tokio::test]
    async fn test_unbounded_policy_deadline_completes() {
        let orchestrator = orchestrator(RegistryBuilder::new().provider("only", 1, StubAdapter::succeeding()).build());
        let policy = RoutingPolicy::new().deadline(Duration::MAX);

        let result = orchestrator.complete(&request("hi"), &policy).await.unwrap();
        assert_eq!(result.provider, "only");
    }

    /// An absurd retry-after hint cools the provider down without breaking the call
    #[tokio::test]
    async fn test_unbounded_retry_after_fails_over() {
        let limited = StubAdapter::failing(ProviderError::rate_limit("stub", Some(u64::MAX)));
        let good = StubAdapter::succeeding();
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("bad", 1, limited.clone())
                .provider("good", 2, good.clone())
                .build(),
        );

        let result = orchestrator.complete(&request("hi"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!(result.provider, "good");

        let health = orchestrator.health().provider_health("bad");
        assert!(!health.eligible);
        assert!(health.cooldown_remaining_ms.is_some_and(|ms| ms <= 3_600_000));

        let again = orchestrator.complete(&request("hi"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!(again.provider, "good");
        assert_eq!(limited.calls(), 1);
    }

    /// Settings that would break background probes are rejected at construction
    #[test]
    fn test_with_registry_rejects_invalid_settings() {
        let mut config = Config::default();
        config.orchestrator.health.probe_interval_secs = 0;
        let result = Orchestrator::with_registry(
            &config,
            RegistryBuilder::new().provider("only", 1, StubAdapter::succeeding()).build(),
        );
        assert!(result.is_err());
    }

    /// A rate-limited provider is skipped while its cooldown runs
    #[tokio::test]
    async fn test_rate_limit_cooldown_skips_provider() {
        let limited = StubAdapter::scripted([Step::Fail(ProviderError::rate_limit("stub", Some(60)))]);
        let backup = StubAdapter::succeeding();
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("limited", 1, limited.clone())
                .provider("backup", 2, backup.clone())
                .build(),
        );

        let first = orchestrator.complete(&request("one"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!((first.provider.as_str(), first.attempts), ("backup", 2));

        let second = orchestrator.complete(&request("two"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!((second.provider.as_str(), second.attempts), ("backup", 1));
        assert_eq!(limited.calls(), 1);

        let status = &orchestrator.provider_status()["limited"];
        assert!(!status.eligible);
        assert!(status.cooldown_remaining_ms.is_some());
    }

    /// Policy preference and fallback order
    #[tokio::test]
    async fn test_policy_preference_and_fallback_order() {
        let a = StubAdapter::succeeding();
        let b = StubAdapter::failing(ProviderError::provider_unavailable("stub", "down"));
        let c = StubAdapter::succeeding();
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("a", 1, a.clone())
                .provider("b", 2, b.clone())
                .provider("c", 3, c.clone())
                .build(),
        );

        let policy = RoutingPolicy::new().prefer("b").fallback_order(["c"]);
        let result = orchestrator.complete(&request("hi"), &policy).await.unwrap();
        assert_eq!(result.provider, "c");
        assert_eq!(result.attempts, 2);
        assert_eq!(a.calls(), 0);

        let policy = RoutingPolicy::new().fallback_order(["b"]).max_attempts(1);
        let err = orchestrator.complete(&request("hi"), &policy).await.unwrap_err();
        assert_eq!(err.tried_providers(), vec!["b"]);
    }

    /// Failed calls that report usage are billed
    #[tokio::test]
    async fn test_partial_usage_on_failover_is_billed() {
        let cut = StubAdapter::scripted([Step::FailWithUsage(
            ProviderError::provider_unavailable("stub", "connection reset mid-response"),
            Usage::new(500, 20),
        )]);
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .priced("cut", 1, RateTable::new(1.0, 1.0), cut)
                .priced("ok", 2, RateTable::new(1.0, 1.0), StubAdapter::succeeding())
                .build(),
        );

        let result = orchestrator.complete(&request("hi"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!(result.provider, "ok");

        let spend = orchestrator.usage().spend_by_provider();
        assert!((spend["cut"] - 0.52).abs() < 1e-9);
        assert!((spend["ok"] - 0.16).abs() < 1e-9);
        assert_eq!(orchestrator.usage().ledger_len(), 2);
    }

    /// Tenants over budget get no candidates
    #[tokio::test]
    async fn test_tenant_budget_is_enforced() {
        let mut config = Config::default();
        config
            .orchestrator
            .cost
            .tenant_budgets
            .insert("acme".to_string(), 0.2);
        let orchestrator = Orchestrator::with_registry(
            &config,
            RegistryBuilder::new()
                .priced("a", 1, RateTable::new(1.0, 1.0), StubAdapter::succeeding())
                .build(),
        )
        .unwrap();
        let policy = RoutingPolicy::new().tenant("acme");
        let short = NormalizedRequest::builder()
            .user("hi")
            .max_output_tokens(100)
            .build()
            .unwrap();

        // 0.16 spent, 0.04 left
        orchestrator.complete(&short, &policy).await.unwrap();
        assert!((orchestrator.usage().remaining_budget("acme", 0.2) - 0.04).abs() < 1e-9);

        let err = orchestrator.complete(&short, &policy).await.unwrap_err();
        assert_eq!(err.reason, ExhaustionReason::NoEligibleCandidates);
        assert_eq!(err.excluded[0].reason, ExclusionReason::OverCostCeiling);
    }

    /// Status covers every registered provider, observed or not
    #[tokio::test]
    async fn test_provider_status_lists_all_providers() {
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("a", 1, StubAdapter::succeeding())
                .provider("b", 2, StubAdapter::succeeding())
                .build(),
        );
        orchestrator.complete(&request("hi"), &RoutingPolicy::new()).await.unwrap();

        let status = orchestrator.provider_status();
        assert_eq!(status.len(), 2);
        assert_eq!(status["a"].samples, 1);
        assert_eq!(status["b"].samples, 0);
        assert_eq!(status["b"].status, HealthStatus::Healthy);
    }

    /// Registry reload keeps surviving providers' health
    #[tokio::test]
    async fn test_reload_with_registry() {
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("a", 1, StubAdapter::failing(ProviderError::timeout("stub", "slow")))
                .provider("b", 2, StubAdapter::succeeding())
                .build(),
        );
        orchestrator.complete(&request("hi"), &RoutingPolicy::new()).await.unwrap();

        orchestrator.reload_with_registry(
            &Config::default(),
            RegistryBuilder::new()
                .provider("a", 1, StubAdapter::succeeding())
                .provider("c", 2, StubAdapter::succeeding())
                .build(),
        );

        let status = orchestrator.provider_status();
        assert_eq!(status.keys().cloned().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(status["a"].consecutive_failures, 1);
        let result = orchestrator.complete(&request("hi"), &RoutingPolicy::new()).await.unwrap();
        assert_eq!(result.provider, "a");
    }

    /// JSON requests only go to JSON-capable providers and come back parsed
    #[tokio::test]
    async fn test_json_output_is_parsed() {
        let plain = StubAdapter::succeeding();
        let structured = StubAdapter::scripted([Step::Reply("```json\n{\"risk\": \"low\"}\n```".to_string())]);
        let orchestrator = orchestrator(
            RegistryBuilder::new()
                .provider("plain", 1, plain.clone())
                .descriptor(
                    ProviderDescriptor::new("structured", ProviderType::Gemini, "gemini-1.5-flash")
                        .with_priority(2)
                        .with_capabilities([Capability::CHAT, Capability::JSON_OUTPUT]),
                    structured,
                )
                .build(),
        );

        let request = NormalizedRequest::builder()
            .user("rate the risk")
            .json_output()
            .build()
            .unwrap();
        let result = orchestrator.complete(&request, &RoutingPolicy::new()).await.unwrap();

        assert_eq!(result.provider, "structured");
        assert_eq!(result.structured, Some(serde_json::json!({"risk": "low"})));
        assert_eq!(plain.calls(), 0);
    }
}
