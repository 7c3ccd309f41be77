//! Health monitoring for providers
//!
//! # Module Structure
//!
//! - `types` - Health status levels, outcomes and snapshots
//! - `record` - Per-provider rolling window and status transitions
//! - `monitor` - Health monitor: outcome recording and reads
//! - `routing` - Health-based candidate ranking
//! - `probe` - Active probing
//! - `tests` - Test suite for health monitoring

pub mod monitor;
pub mod probe;
pub mod record;
pub mod routing;
pub mod types;

pub use crate::config::HealthMonitorConfig;
pub use monitor::HealthMonitor;
pub use record::HealthRecord;
pub use types::{HealthSnapshot, HealthStatus, Outcome, OutcomeSource};
