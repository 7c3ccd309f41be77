//! Normalized results

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Token usage reported by (or estimated for) a provider call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input/prompt tokens
    pub input_tokens: u32,
    /// Output/completion tokens
    pub output_tokens: u32,
}

impl Usage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// What an adapter hands back on success, before cost and timing are attached
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Generated text
    pub text: String,
    /// Upstream model that served the call
    pub model: String,
    /// Usage as reported by the provider, if it reports any
    pub usage: Option<Usage>,
    /// Provider finish/stop reason
    pub finish_reason: Option<String>,
}

/// Final normalized result of a routed call
#[derive(Debug, Clone, Serialize)]
pub struct CallResult {
    pub correlation_id: Uuid,
    /// Configured provider id that produced the result
    pub provider: String,
    /// Upstream model name
    pub model: String,
    pub text: String,
    /// Parsed JSON payload when JSON output was requested and the text parses
    pub structured: Option<serde_json::Value>,
    #[serde(with = "duration_millis")]
    pub latency: Duration,
    pub usage: Usage,
    pub estimated_cost: f64,
    /// Number of attempts made, including the successful one
    pub attempts: u32,
    pub finish_reason: Option<String>,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
