//! Credential references
//!
//! Configuration never has to hold a raw key: a provider points at an environment
//! variable instead. Inline keys are supported for tests and local setups, wrapped in
//! [`Secret`] so they cannot leak through `Debug` or `Display`.

use super::unified_provider::ProviderError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// A secret string that is redacted when formatted or serialized
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value, for building request headers only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret)
    }
}

/// Where a provider's credential comes from
///
/// In configuration this is a map with at most one key: `{ env: VAR }` or
/// `{ inline: key }`. An absent or empty map means no credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CredentialEntry", into = "CredentialEntry")]
pub enum CredentialRef {
    /// No credential (local inference servers)
    #[default]
    None,
    /// Read from the named environment variable at call time
    Env(String),
    /// Inline secret
    Inline(Secret),
}

/// Configuration shape of [`CredentialRef`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline: Option<Secret>,
}

impl TryFrom<CredentialEntry> for CredentialRef {
    type Error = String;

    fn try_from(entry: CredentialEntry) -> Result<Self, Self::Error> {
        match (entry.env, entry.inline) {
            (Some(_), Some(_)) => Err("credential must set only one of `env` or `inline`".to_string()),
            (Some(var), None) if var.trim().is_empty() => {
                Err("credential `env` must name a variable".to_string())
            }
            (Some(var), None) => Ok(CredentialRef::Env(var)),
            (None, Some(secret)) => Ok(CredentialRef::Inline(secret)),
            (None, None) => Ok(CredentialRef::None),
        }
    }
}

impl From<CredentialRef> for CredentialEntry {
    fn from(credential: CredentialRef) -> Self {
        match credential {
            CredentialRef::None => CredentialEntry::default(),
            CredentialRef::Env(var) => CredentialEntry {
                env: Some(var),
                inline: None,
            },
            CredentialRef::Inline(secret) => CredentialEntry {
                env: None,
                inline: Some(secret),
            },
        }
    }
}

impl CredentialRef {
    /// Resolve the credential
    ///
    /// A missing environment variable is reported as an authentication failure so the
    /// provider is taken out of rotation like any other rejected credential.
    pub fn resolve(&self, provider: &'static str) -> Result<Option<Secret>, ProviderError> {
        match self {
            CredentialRef::None => Ok(None),
            CredentialRef::Env(var) => match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => Ok(Some(Secret::new(value))),
                _ => Err(ProviderError::authentication(
                    provider,
                    format!("credential environment variable {} is not set", var),
                )),
            },
            CredentialRef::Inline(secret) => Ok(Some(secret.clone())),
        }
    }

    /// Description safe for logs
    pub fn describe(&self) -> String {
        match self {
            CredentialRef::None => "none".to_string(),
            CredentialRef::Env(var) => format!("env:{}", var),
            CredentialRef::Inline(_) => format!("inline:{}", REDACTED),
        }
    }
}
