//! Module
//!
//! Contains base components shared by all provider adapters

pub mod dispatch;
pub mod error_mapper;
pub mod protocol;
pub mod transport;

pub use dispatch::{base_headers, send_json};
pub use error_mapper::ErrorMapper;
pub use protocol::{WireProtocol, invoke_wire, usage_from};
pub use transport::{HttpReply, HttpTransport, ReqwestTransport, TransportError};
