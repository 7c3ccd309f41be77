//! Anthropic Messages API

pub mod provider;
pub mod transform;

pub use provider::AnthropicAdapter;

pub const PROVIDER_NAME: &str = "anthropic";

/// API constants
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
/// The Messages API requires `max_tokens`
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
