//! Request and response transformation for `generateContent`

use super::{API_VERSION_PATH, PROVIDER_NAME};
use crate::core::providers::base::usage_from;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::types::{MessageRole, NormalizedRequest, ProviderResponse};
use serde_json::{Map, Value, json};

pub fn generate_url(descriptor: &ProviderDescriptor) -> String {
    format!(
        "{}/{}/models/{}:generateContent",
        descriptor.endpoint, API_VERSION_PATH, descriptor.model
    )
}

pub fn build_generate_body(request: &NormalizedRequest) -> Value {
    let contents: Vec<Value> = request
        .messages()
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| {
            let role = match m.role {
                MessageRole::Assistant => "model",
                _ => "user",
            };
            json!({"role": role, "parts": [{"text": m.content}]})
        })
        .collect();

    let mut body = Map::new();
    body.insert("contents".into(), Value::Array(contents));
    if let Some(system) = request.system_prompt() {
        body.insert(
            "systemInstruction".into(),
            json!({"parts": [{"text": system}]}),
        );
    }

    let mut generation = Map::new();
    if let Some(max_tokens) = request.max_output_tokens() {
        generation.insert("maxOutputTokens".into(), json!(max_tokens));
    }
    if let Some(temperature) = request.temperature() {
        generation.insert("temperature".into(), json!(temperature));
    }
    if request.json_output() {
        generation.insert("responseMimeType".into(), json!("application/json"));
    }
    if !generation.is_empty() {
        body.insert("generationConfig".into(), Value::Object(generation));
    }
    Value::Object(body)
}

pub fn parse_generate_response(
    body: Value,
    descriptor: &ProviderDescriptor,
) -> Result<ProviderResponse, AdapterFailure> {
    let usage = usage_from(
        &body,
        "/usageMetadata/promptTokenCount",
        "/usageMetadata/candidatesTokenCount",
    );
    let fail = |error: ProviderError| match usage {
        Some(usage) => AdapterFailure::with_usage(error, usage),
        None => error.into(),
    };

    if let Some(reason) = body.pointer("/promptFeedback/blockReason").and_then(Value::as_str) {
        return Err(fail(ProviderError::invalid_request(
            PROVIDER_NAME,
            format!("prompt blocked: {}", reason),
        )));
    }

    let candidate = body.pointer("/candidates/0");
    let parts = candidate
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(Value::as_array);

    let Some(parts) = parts else {
        return Err(fail(ProviderError::response_parsing(
            PROVIDER_NAME,
            "missing candidates[0].content.parts",
        )));
    };

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    Ok(ProviderResponse {
        text,
        model: body
            .get("modelVersion")
            .and_then(Value::as_str)
            .unwrap_or(&descriptor.model)
            .to_string(),
        usage,
        finish_reason: candidate
            .and_then(|c| c.get("finishReason"))
            .and_then(Value::as_str)
            .map(|r| r.to_lowercase()),
    })
}
