//! Request and response transformation for the chat completions format

use super::{DEFAULT_AZURE_API_VERSION, PROVIDER_NAME};
use crate::core::providers::base::usage_from;
use crate::core::providers::credentials::Secret;
use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::provider_type::ProviderType;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::types::{NormalizedRequest, ProviderResponse};
use serde_json::{Map, Value, json};

pub fn chat_url(descriptor: &ProviderDescriptor) -> String {
    match descriptor.provider_type {
        ProviderType::AzureOpenAI => format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            descriptor.endpoint,
            descriptor.model,
            descriptor
                .api_version
                .as_deref()
                .unwrap_or(DEFAULT_AZURE_API_VERSION)
        ),
        _ => format!("{}/chat/completions", descriptor.endpoint),
    }
}

/// Azure takes the key in `api-key`; everyone else uses a bearer token
pub fn auth_header(descriptor: &ProviderDescriptor, secret: &Secret) -> (String, String) {
    match descriptor.provider_type {
        ProviderType::AzureOpenAI => ("api-key".to_string(), secret.expose().to_string()),
        _ => (
            "Authorization".to_string(),
            format!("Bearer {}", secret.expose()),
        ),
    }
}

pub fn build_chat_body(request: &NormalizedRequest, descriptor: &ProviderDescriptor) -> Value {
    let messages: Vec<Value> = request
        .messages()
        .iter()
        .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
        .collect();

    let mut body = Map::new();
    body.insert("model".into(), json!(descriptor.model));
    body.insert("messages".into(), Value::Array(messages));
    if let Some(max_tokens) = request.max_output_tokens() {
        body.insert("max_tokens".into(), json!(max_tokens));
    }
    if let Some(temperature) = request.temperature() {
        body.insert("temperature".into(), json!(temperature));
    }
    if request.json_output() {
        body.insert("response_format".into(), json!({"type": "json_object"}));
    }
    Value::Object(body)
}

pub fn parse_chat_response(
    body: Value,
    descriptor: &ProviderDescriptor,
) -> Result<ProviderResponse, AdapterFailure> {
    let usage = usage_from(&body, "/usage/prompt_tokens", "/usage/completion_tokens");

    let choice = body.pointer("/choices/0");
    let text = choice
        .and_then(|c| c.pointer("/message/content"))
        .and_then(Value::as_str);

    let Some(text) = text else {
        let error = ProviderError::response_parsing(PROVIDER_NAME, "missing choices[0].message.content");
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
        finish_reason: choice
            .and_then(|c| c.get("finish_reason"))
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
