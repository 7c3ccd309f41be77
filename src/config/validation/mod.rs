//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `endpoint`: Base URL checks
//! - `provider_validators`: Provider entries and the provider list
//! - `orchestrator_validators`: Router, health, cost and HTTP settings
//! - `tests`: Test suite for all validators

mod endpoint;
mod orchestrator_validators;
mod provider_validators;
mod trait_def;

pub use endpoint::validate_base_url;
pub use trait_def::Validate;
