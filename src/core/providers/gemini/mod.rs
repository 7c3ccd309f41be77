//! Google Gemini `generateContent` API

pub mod provider;
pub mod transform;

pub use provider::GeminiAdapter;

pub const PROVIDER_NAME: &str = "gemini";
pub const API_VERSION_PATH: &str = "v1beta";
