//! Ollama native chat API

pub mod provider;
pub mod transform;

pub use provider::OllamaAdapter;

pub const PROVIDER_NAME: &str = "ollama";
