//! Normalized request
//!
//! A [`NormalizedRequest`] is what feature code hands to the orchestrator. It is
//! provider-agnostic and immutable once built: fields are private and only exposed
//! through accessors.

use super::capability::{Capability, CapabilitySet};
use crate::core::providers::unified_provider::ProviderError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const REQUEST_SOURCE: &str = "orchestrator";

/// Longest overall deadline a routed call may run under
pub const MAX_CALL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single prompt message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Provider-agnostic completion request
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    correlation_id: Uuid,
    messages: Vec<PromptMessage>,
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
    json_output: bool,
    required_capabilities: CapabilitySet,
    provider_hint: Option<String>,
    max_cost: Option<f64>,
    timeout: Option<Duration>,
    tenant_id: Option<String>,
}

impl NormalizedRequest {
    /// Start building a request
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Minimal synthetic request used by health probes
    pub fn probe() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            messages: vec![PromptMessage::user("ping")],
            max_output_tokens: Some(1),
            temperature: Some(0.0),
            json_output: false,
            required_capabilities: CapabilitySet::new(),
            provider_hint: None,
            max_cost: None,
            timeout: None,
            tenant_id: None,
        }
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn messages(&self) -> &[PromptMessage] {
        &self.messages
    }

    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn json_output(&self) -> bool {
        self.json_output
    }

    pub fn required_capabilities(&self) -> &CapabilitySet {
        &self.required_capabilities
    }

    pub fn provider_hint(&self) -> Option<&str> {
        self.provider_hint.as_deref()
    }

    pub fn max_cost(&self) -> Option<f64> {
        self.max_cost
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// Total characters across all messages, used for pre-call token estimates
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }

    /// Concatenated system messages, for providers that take the system prompt separately
    pub fn system_prompt(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }
}

/// Builder for [`NormalizedRequest`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
    correlation_id: Option<Uuid>,
    messages: Vec<PromptMessage>,
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
    json_output: bool,
    required_capabilities: CapabilitySet,
    provider_hint: Option<String>,
    max_cost: Option<f64>,
    timeout: Option<Duration>,
    tenant_id: Option<String>,
}

impl RequestBuilder {
    pub fn correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    pub fn message(mut self, message: PromptMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(PromptMessage::system(content))
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(PromptMessage::user(content))
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = PromptMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Ask for a JSON object response; also requires the `json` capability
    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self.required_capabilities
            .insert(Capability::new(Capability::JSON_OUTPUT));
        self
    }

    pub fn require(mut self, capability: impl Into<Capability>) -> Self {
        self.required_capabilities.insert(capability.into());
        self
    }

    pub fn provider_hint(mut self, provider: impl Into<String>) -> Self {
        self.provider_hint = Some(provider.into());
        self
    }

    pub fn max_cost(mut self, ceiling: f64) -> Self {
        self.max_cost = Some(ceiling);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Finish the request
    ///
    /// Fails with a `MalformedRequest` kind when the prompt is empty, the cost
    /// ceiling is negative or the timeout is zero or longer than [`MAX_CALL_TIMEOUT`].
    pub fn build(self) -> Result<NormalizedRequest, ProviderError> {
        if self.messages.iter().all(|m| m.content.trim().is_empty()) {
            return Err(ProviderError::invalid_request(
                REQUEST_SOURCE,
                "request has no non-empty messages",
            ));
        }

        if let Some(ceiling) = self.max_cost {
            if !ceiling.is_finite() || ceiling < 0.0 {
                return Err(ProviderError::invalid_request(
                    REQUEST_SOURCE,
                    format!("invalid cost ceiling: {}", ceiling),
                ));
            }
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(ProviderError::invalid_request(
                REQUEST_SOURCE,
                "timeout must be greater than zero",
            ));
        }

        if self.timeout.is_some_and(|t| t > MAX_CALL_TIMEOUT) {
            return Err(ProviderError::invalid_request(
                REQUEST_SOURCE,
                format!("timeout must not exceed {} s", MAX_CALL_TIMEOUT.as_secs()),
            ));
        }

        let mut required_capabilities = self.required_capabilities;
        if required_capabilities.is_empty() {
            required_capabilities.insert(Capability::chat());
        }

        Ok(NormalizedRequest {
            correlation_id: self.correlation_id.unwrap_or_else(Uuid::new_v4),
            messages: self.messages,
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            json_output: self.json_output,
            required_capabilities,
            provider_hint: self.provider_hint,
            max_cost: self.max_cost,
            timeout: self.timeout,
            tenant_id: self.tenant_id,
        })
    }
}
