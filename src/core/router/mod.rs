//! Core router for provider selection and failover
//!
//! ## Module Structure
//!
//! - `policy` - Caller routing constraints
//! - `state` - Router states, attempt records and the route trace
//! - `error` - Aggregate routing error and exclusion reasons
//! - `selection` - Candidate filtering and ordering
//! - `execution` - Attempt timeouts and result post-processing
//! - `router` - Core Router struct and the failover loop

pub mod error;
pub mod execution;
pub mod policy;
pub mod router;
pub mod selection;
pub mod state;


pub use error::{AggregateError, Exclusion, ExclusionReason, ExhaustionReason};
pub use policy::RoutingPolicy;
pub use router::Router;
pub use selection::Selection;
pub use state::{AttemptFailure, RouteState, RouteTrace};
