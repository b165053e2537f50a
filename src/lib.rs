//! Transparent HTTP forwarding gateway for an inference backend.
//!
//! Every inbound request is rewritten onto a single configured origin and
//! relayed back with status, headers and body unchanged, streaming in both
//! directions.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::{GatewayConfig, Origin};
pub use http::{Forwarder, GatewayServer};
pub use lifecycle::Shutdown;
