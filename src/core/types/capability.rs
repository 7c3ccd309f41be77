//! Capability tags
//!
//! Requests declare the capabilities they need and providers declare the ones they
//! offer. Tags are free-form lowercase strings so configuration can introduce new
//! ones without a code change; the common ones have constants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single capability tag such as `chat` or `long-context`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Capability(String);

/// Ordered set of capabilities
pub type CapabilitySet = BTreeSet<Capability>;

impl Capability {
    pub const CHAT: &'static str = "chat";
    pub const LONG_CONTEXT: &'static str = "long-context";
    pub const VISION: &'static str = "vision";
    pub const JSON_OUTPUT: &'static str = "json";
    pub const TOOLS: &'static str = "tools";

    /// Create a capability tag, normalizing case and surrounding whitespace
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_lowercase())
    }

    pub fn chat() -> Self {
        Self::new(Self::CHAT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Capability {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Capability {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
