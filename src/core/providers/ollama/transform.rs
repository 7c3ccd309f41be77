//! Request and response transformation for `/api/chat`

use super::PROVIDER_NAME;
use crate::core::providers::base::usage_from;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::types::{NormalizedRequest, ProviderResponse};
use serde_json::{Map, Value, json};

pub fn chat_url(descriptor: &ProviderDescriptor) -> String {
    format!("{}/api/chat", descriptor.endpoint)
}

pub fn build_chat_body(request: &NormalizedRequest, descriptor: &ProviderDescriptor) -> Value {
    let messages: Vec<Value> = request
        .messages()
        .iter()
        .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
        .collect();

    let mut options = Map::new();
    if let Some(max_tokens) = request.max_output_tokens() {
        options.insert("num_predict".into(), json!(max_tokens));
    }
    if let Some(temperature) = request.temperature() {
        options.insert("temperature".into(), json!(temperature));
    }

    let mut body = Map::new();
    body.insert("model".into(), json!(descriptor.model));
    body.insert("messages".into(), Value::Array(messages));
    body.insert("stream".into(), json!(false));
    if !options.is_empty() {
        body.insert("options".into(), Value::Object(options));
    }
    if request.json_output() {
        body.insert("format".into(), json!("json"));
    }
    Value::Object(body)
}

pub fn parse_chat_response(
    body: Value,
    descriptor: &ProviderDescriptor,
) -> Result<ProviderResponse, AdapterFailure> {
    let usage = usage_from(&body, "/prompt_eval_count", "/eval_count");

    let Some(text) = body.pointer("/message/content").and_then(Value::as_str) else {
        let error = ProviderError::response_parsing(PROVIDER_NAME, "missing message.content");
        return Err(match usage {
            Some(usage) => AdapterFailure::with_usage(error, usage),
            None => error.into(),
        });
    };

    Ok(ProviderResponse {
        text: text.to_string(),
        model: body
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(&descriptor.model)
            .to_string(),
        usage,
        finish_reason: body
            .get("done_reason")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
