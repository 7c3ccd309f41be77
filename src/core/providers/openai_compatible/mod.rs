//! OpenAI-compatible chat completions
//!
//! Serves OpenAI itself plus every provider exposing the same `/chat/completions`
//! surface: Azure OpenAI, OpenRouter, Groq, Mistral, DeepSeek, Together, xAI,
//! Fireworks, vLLM and LM Studio.

pub mod provider;
pub mod transform;

pub use provider::OpenAICompatibleAdapter;

pub const PROVIDER_NAME: &str = "openai_compatible";

/// Azure OpenAI API version used when the descriptor does not name one
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";
