//! Provider type tags
//!
//! The type tag in a provider's configuration picks the adapter family and supplies
//! defaults (base URL, auth header style) for that vendor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "azure_openai")]
    AzureOpenAI,
    Anthropic,
    Gemini,
    Ollama,
    LmStudio,
    Vllm,
    #[serde(rename = "openrouter")]
    OpenRouter,
    Groq,
    Mistral,
    #[serde(rename = "deepseek")]
    DeepSeek,
    Together,
    #[serde(rename = "xai")]
    XAI,
    Fireworks,
}

/// Adapter implementation used for a provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterFamily {
    OpenAICompatible,
    Anthropic,
    Gemini,
    Ollama,
}

impl ProviderType {
    pub const ALL: [ProviderType; 14] = [
        ProviderType::OpenAI,
        ProviderType::AzureOpenAI,
        ProviderType::Anthropic,
        ProviderType::Gemini,
        ProviderType::Ollama,
        ProviderType::LmStudio,
        ProviderType::Vllm,
        ProviderType::OpenRouter,
        ProviderType::Groq,
        ProviderType::Mistral,
        ProviderType::DeepSeek,
        ProviderType::Together,
        ProviderType::XAI,
        ProviderType::Fireworks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::AzureOpenAI => "azure_openai",
            ProviderType::Anthropic => "anthropic",
            ProviderType::Gemini => "gemini",
            ProviderType::Ollama => "ollama",
            ProviderType::LmStudio => "lm_studio",
            ProviderType::Vllm => "vllm",
            ProviderType::OpenRouter => "openrouter",
            ProviderType::Groq => "groq",
            ProviderType::Mistral => "mistral",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Together => "together",
            ProviderType::XAI => "xai",
            ProviderType::Fireworks => "fireworks",
        }
    }

    pub fn family(&self) -> AdapterFamily {
        match self {
            ProviderType::Anthropic => AdapterFamily::Anthropic,
            ProviderType::Gemini => AdapterFamily::Gemini,
            ProviderType::Ollama => AdapterFamily::Ollama,
            _ => AdapterFamily::OpenAICompatible,
        }
    }

    /// Default API base URL; `None` when the endpoint is deployment specific
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("https://api.openai.com/v1"),
            ProviderType::AzureOpenAI => None,
            ProviderType::Anthropic => Some("https://api.anthropic.com"),
            ProviderType::Gemini => Some("https://generativelanguage.googleapis.com"),
            ProviderType::Ollama => Some("http://localhost:11434"),
            ProviderType::LmStudio => Some("http://localhost:1234/v1"),
            ProviderType::Vllm => Some("http://localhost:8000/v1"),
            ProviderType::OpenRouter => Some("https://openrouter.ai/api/v1"),
            ProviderType::Groq => Some("https://api.groq.com/openai/v1"),
            ProviderType::Mistral => Some("https://api.mistral.ai/v1"),
            ProviderType::DeepSeek => Some("https://api.deepseek.com/v1"),
            ProviderType::Together => Some("https://api.together.xyz/v1"),
            ProviderType::XAI => Some("https://api.x.ai/v1"),
            ProviderType::Fireworks => Some("https://api.fireworks.ai/inference/v1"),
        }
    }

    /// Local inference servers usually run without credentials
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ProviderType::Ollama | ProviderType::LmStudio | ProviderType::Vllm
        )
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown provider type: {}", s))
    }
}
