//! Request and response transformation for the Messages API

use super::{DEFAULT_MAX_TOKENS, PROVIDER_NAME};
use crate::core::providers::base::usage_from;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::types::{MessageRole, NormalizedRequest, ProviderResponse};
use serde_json::{Map, Value, json};

pub fn messages_url(descriptor: &ProviderDescriptor) -> String {
    format!("{}/v1/messages", descriptor.endpoint)
}

/// System messages go in the top-level `system` field; the rest keep their order
pub fn build_messages_body(request: &NormalizedRequest, descriptor: &ProviderDescriptor) -> Value {
    let messages: Vec<Value> = request
        .messages()
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
        .collect();

    let mut body = Map::new();
    body.insert("model".into(), json!(descriptor.model));
    body.insert("messages".into(), Value::Array(messages));
    body.insert(
        "max_tokens".into(),
        json!(request.max_output_tokens().unwrap_or(DEFAULT_MAX_TOKENS)),
    );

    let mut system = request.system_prompt();
    if request.json_output() {
        let instruction = "Respond with a single valid JSON value and nothing else.";
        system = Some(match system {
            Some(s) => format!("{}\n\n{}", s, instruction),
            None => instruction.to_string(),
        });
    }
    if let Some(system) = system {
        body.insert("system".into(), json!(system));
    }
    if let Some(temperature) = request.temperature() {
        body.insert("temperature".into(), json!(temperature));
    }
    Value::Object(body)
}

pub fn parse_messages_response(
    body: Value,
    descriptor: &ProviderDescriptor,
) -> Result<ProviderResponse, AdapterFailure> {
    let usage = usage_from(&body, "/usage/input_tokens", "/usage/output_tokens");

    let blocks = body.get("content").and_then(Value::as_array);
    let text: Option<String> = blocks.map(|blocks| {
        blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect()
    });

    let Some(text) = text else {
        let error = ProviderError::response_parsing(PROVIDER_NAME, "missing content blocks");
        return Err(match usage {
            Some(usage) => AdapterFailure::with_usage(error, usage),
            None => error.into(),
        });
    };

    Ok(ProviderResponse {
        text,
        model: body
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(&descriptor.model)
            .to_string(),
        usage,
        finish_reason: body
            .get("stop_reason")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
