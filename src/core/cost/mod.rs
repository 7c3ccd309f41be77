//! Cost & usage tracking
//!
//! - `types` - Rate tables, ledger entries and errors
//! - `calculator` - Pure cost functions
//! - `ledger` - Append-only usage ledger
//! - `tracker` - Per-provider pricing, spend aggregation and tenant budgets

pub mod calculator;
pub mod ledger;
pub mod tracker;
pub mod types;

pub use calculator::{estimate_cost, estimate_request_cost, estimate_request_usage};
pub use ledger::{InMemoryLedger, UsageLedger};
pub use tracker::CostTracker;
pub use types::{CostError, CostResult, LedgerOutcome, RateTable, UsageLedgerEntry};
