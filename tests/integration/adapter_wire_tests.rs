//! Adapter wire tests against a mock HTTP server

#[cfg(test)]
mod tests {
    use ai_orchestrator::config::{HttpConfig, ProviderConfig};
    use ai_orchestrator::core::providers::{
        AnthropicAdapter, CredentialRef, GeminiAdapter, OllamaAdapter, OpenAICompatibleAdapter,
        ProviderDescriptor, ProviderType, ReqwestTransport, Secret,
    };
    use ai_orchestrator::{
        Config, ErrorKind, HealthStatus, NormalizedRequest, Orchestrator, ProviderAdapter, RoutingPolicy,
        Usage,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> Arc<ReqwestTransport> {
        Arc::new(ReqwestTransport::new(&HttpConfig::default()).unwrap())
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    fn hello() -> NormalizedRequest {
        NormalizedRequest::builder()
            .system("be brief")
            .user("hello")
            .max_output_tokens(64)
            .build()
            .unwrap()
    }

    fn inline(key: &str) -> CredentialRef {
        CredentialRef::Inline(Secret::new(key))
    }

    #[tokio::test]
    async fn test_openai_compatible_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini", "max_tokens": 64})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{"message": {"role": "assistant", "content": "Hi!"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 11, "completion_tokens": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let descriptor = ProviderDescriptor::new("openai", ProviderType::OpenAI, "gpt-4o-mini")
            .with_endpoint(format!("{}/v1", server.uri()))
            .with_credential(inline("sk-test"));
        let adapter = OpenAICompatibleAdapter::new(transport());
        let response = adapter.invoke(&hello(), &descriptor, deadline()).await.unwrap();

        assert_eq!(response.text, "Hi!");
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(response.usage, Some(Usage::new(11, 2)));
    }

    #[tokio::test]
    async fn test_anthropic_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({"system": "be brief"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "claude-3-5-haiku-latest",
                "content": [{"type": "text", "text": "Hello."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 9, "output_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let descriptor = ProviderDescriptor::new("claude", ProviderType::Anthropic, "claude-3-5-haiku-latest")
            .with_endpoint(server.uri())
            .with_credential(inline("sk-ant-test"));
        let response = AnthropicAdapter::new(transport())
            .invoke(&hello(), &descriptor, deadline())
            .await
            .unwrap();

        assert_eq!(response.text, "Hello.");
        assert_eq!(response.usage, Some(Usage::new(9, 3)));
    }

    #[tokio::test]
    async fn test_anthropic_overloaded_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .mount(&server)
            .await;

        let descriptor = ProviderDescriptor::new("claude", ProviderType::Anthropic, "claude-3-5-haiku-latest")
            .with_endpoint(server.uri())
            .with_credential(inline("sk-ant-test"));
        let failure = AnthropicAdapter::new(transport())
            .invoke(&hello(), &descriptor, deadline())
            .await
            .unwrap_err();
        assert_eq!(failure.error.kind(), ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn test_gemini_round_trip_and_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "AIza-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hel"}, {"text": "lo"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"},
                "usageMetadata": {"promptTokenCount": 4}
            })))
            .mount(&server)
            .await;

        let descriptor = ProviderDescriptor::new("gemini", ProviderType::Gemini, "gemini-1.5-flash")
            .with_endpoint(server.uri())
            .with_credential(inline("AIza-test"));
        let adapter = GeminiAdapter::new(transport());

        let response = adapter.invoke(&hello(), &descriptor, deadline()).await.unwrap();
        assert_eq!(response.text, "Hello");
        assert_eq!(response.usage, Some(Usage::new(4, 2)));

        let failure = adapter.invoke(&hello(), &descriptor, deadline()).await.unwrap_err();
        assert_eq!(failure.error.kind(), ErrorKind::MalformedRequest);
        assert_eq!(failure.partial_usage, Some(Usage::new(4, 0)));
    }

    #[tokio::test]
    async fn test_ollama_round_trip_without_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"model": "llama3.1:8b", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.1:8b",
                "message": {"role": "assistant", "content": "hey"},
                "done": true,
                "done_reason": "stop",
                "prompt_eval_count": 14,
                "eval_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let descriptor =
            ProviderDescriptor::new("local", ProviderType::Ollama, "llama3.1:8b").with_endpoint(server.uri());
        let response = OllamaAdapter::new(transport())
            .invoke(&hello(), &descriptor, deadline())
            .await
            .unwrap();

        assert_eq!(response.text, "hey");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage, Some(Usage::new(14, 1)));
    }

    #[tokio::test]
    async fn test_error_statuses_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/limited/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(json!({"error": {"message": "Rate limit reached"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/denied/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "Incorrect API key"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/broken/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream connect error"))
            .mount(&server)
            .await;

        let adapter = OpenAICompatibleAdapter::new(transport());
        let call = |prefix: &str| {
            ProviderDescriptor::new(prefix, ProviderType::OpenAI, "gpt-4o-mini")
                .with_endpoint(format!("{}/{}", server.uri(), prefix))
                .with_credential(inline("sk-test"))
        };

        let limited = adapter.invoke(&hello(), &call("limited"), deadline()).await.unwrap_err();
        assert_eq!(limited.error.kind(), ErrorKind::RateLimited);
        assert_eq!(limited.error.retry_after(), Some(7));

        let denied = adapter.invoke(&hello(), &call("denied"), deadline()).await.unwrap_err();
        assert_eq!(denied.error.kind(), ErrorKind::AuthFailure);
        assert!(denied.error.to_string().contains("Incorrect API key"));

        let broken = adapter.invoke(&hello(), &call("broken"), deadline()).await.unwrap_err();
        assert_eq!(broken.error.kind(), ErrorKind::ProviderUnavailable);
    }

    fn provider_config(name: &str, base_url: String, priority: u32) -> ProviderConfig {
        let mut config = ProviderConfig::new(name, ProviderType::OpenAI, "gpt-4o-mini");
        config.base_url = Some(base_url);
        config.credential = inline("sk-test");
        config.priority = priority;
        config
    }

    #[tokio::test]
    async fn test_orchestrator_fails_over_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/primary/chat/completions"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/secondary/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "from secondary"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.orchestrator.providers = vec![
            provider_config("primary", format!("{}/primary", server.uri()), 1),
            provider_config("secondary", format!("{}/secondary", server.uri()), 2),
        ];
        let orchestrator = Orchestrator::new(&config).unwrap();

        let result = orchestrator.complete(&hello(), &RoutingPolicy::new()).await.unwrap();
        assert_eq!(result.provider, "secondary");
        assert_eq!(result.text, "from secondary");
        assert_eq!(result.attempts, 2);
        assert_eq!(result.model, "gpt-4o-mini");

        let status = orchestrator.provider_status();
        assert_eq!(status["primary"].consecutive_failures, 1);
        assert_eq!(status["primary"].last_error_kind, Some(ErrorKind::ProviderUnavailable));
        assert_eq!(status["secondary"].status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_orchestrator_deadline_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/slow/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(800))
                    .set_body_json(json!({"choices": [{"message": {"content": "late"}}]})),
            )
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.orchestrator.providers = vec![provider_config("slow", format!("{}/slow", server.uri()), 1)];
        let orchestrator = Orchestrator::new(&config).unwrap();

        let request = NormalizedRequest::builder()
            .user("hello")
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let started = std::time::Instant::now();
        let err = orchestrator.complete(&request, &RoutingPolicy::new()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_millis(600));
    }
}
