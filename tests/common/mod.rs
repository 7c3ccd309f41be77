//! Common test utilities
//!
//! - `stubs`: scripted provider adapters
//! - `fixtures`: registry, configuration and request factories

pub mod fixtures;
pub mod stubs;

pub use fixtures::{RegistryBuilder, request};
pub use stubs::{Step, StubAdapter};
