//! # AI Orchestrator
//!
//! Multi-provider LLM orchestration core: one uniform completion interface over
//! heterogeneous backends (cloud APIs, local inference servers, aggregator gateways)
//! with health-aware routing, automatic failover and cost tracking.
//!
//! ## Features
//!
//! - **Uniform requests**: one [`NormalizedRequest`] shape for every provider
//! - **Provider adapters**: OpenAI-compatible, Anthropic, Gemini and Ollama wire protocols
//! - **Health monitoring**: passive call outcomes plus background probes
//! - **Failover**: ranked candidates tried under a single deadline
//! - **Cost tracking**: per-call estimates, append-only ledger, tenant budgets
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_orchestrator::{Config, NormalizedRequest, Orchestrator, RoutingPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/orchestrator.yaml").await?;
//!     let orchestrator = Orchestrator::new(&config)?;
//!     orchestrator.start_probes();
//!
//!     let request = NormalizedRequest::builder()
//!         .system("You are a concise assistant.")
//!         .user("Summarize the key risks of vendor lock-in.")
//!         .max_cost(0.05)
//!         .build()?;
//!
//!     let result = orchestrator.complete(&request, &RoutingPolicy::new()).await?;
//!     println!("{} answered: {}", result.provider, result.text);
//!
//!     orchestrator.shutdown();
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{OrchestratorError, Result};

pub use core::Orchestrator;
pub use core::cost::{CostTracker, RateTable, UsageLedger, UsageLedgerEntry};
pub use core::health::{HealthMonitor, HealthSnapshot, HealthStatus};
pub use core::providers::{
    AdapterFailure, ErrorKind, ProviderDescriptor, ProviderError, ProviderRegistry, ProviderType,
};
pub use core::router::{AggregateError, AttemptFailure, RoutingPolicy};
pub use core::traits::ProviderAdapter;
pub use core::types::{CallResult, Capability, NormalizedRequest, Usage};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
