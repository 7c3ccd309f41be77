//! Normalized request/response types shared by every provider adapter

pub mod capability;
pub mod request;
pub mod response;

pub use capability::{Capability, CapabilitySet};
pub use request::{MAX_CALL_TIMEOUT, MessageRole, NormalizedRequest, PromptMessage, RequestBuilder};
pub use response::{CallResult, ProviderResponse, Usage};
