//! Core orchestration logic
//!
//! Leaf-first: normalized types, provider adapters, health monitoring, cost tracking,
//! the router, and the orchestrator facade that wires them together.

pub mod cost;
pub mod health;
pub mod orchestrator;
pub mod providers;
pub mod router;
pub mod traits;
pub mod types;

pub use orchestrator::Orchestrator;
