//! Core provider adapter trait
//!
//! Defines the single interface the router uses to talk to any provider

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::time::Instant;

use crate::core::providers::descriptor::ProviderDescriptor;
use crate::core::providers::unified_provider::{AdapterFailure, ProviderError};
use crate::core::types::{NormalizedRequest, ProviderResponse};

/// Unified provider adapter interface
///
/// An adapter translates a [`NormalizedRequest`] into one provider's wire format,
/// performs exactly one call, and maps the outcome back. Adapters never retry and
/// never fail over; that is the router's job. Everything an adapter needs to know
/// about the concrete provider comes from the [`ProviderDescriptor`], so one adapter
/// instance serves every provider of its family.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl ProviderAdapter for EchoAdapter {
///     fn name(&self) -> &'static str {
///         "echo"
///     }
///
///     async fn invoke(
///         &self,
///         request: &NormalizedRequest,
///         descriptor: &ProviderDescriptor,
///         _deadline: Instant,
///     ) -> Result<ProviderResponse, AdapterFailure> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug + 'static {
    /// Adapter family name
    fn name(&self) -> &'static str;

    /// Perform one completion call, bounded by `deadline`
    ///
    /// Must return `UnsupportedCapability` without any network I/O when the request
    /// needs a capability the descriptor lacks.
    async fn invoke(
        &self,
        request: &NormalizedRequest,
        descriptor: &ProviderDescriptor,
        deadline: Instant,
    ) -> Result<ProviderResponse, AdapterFailure>;

    /// Lightweight liveness check
    ///
    /// The default sends a minimal one-token completion.
    async fn probe(&self, descriptor: &ProviderDescriptor, deadline: Instant) -> Result<(), ProviderError> {
        self.invoke(&NormalizedRequest::probe(), descriptor, deadline)
            .await
            .map(|_| ())
            .map_err(|failure| failure.error)
    }
}
