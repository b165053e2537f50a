//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! accepted connection
//!     → server.rs (Axum setup, catch-all route, tracing)
//!     → forward.rs (resolve target, build outbound request, dispatch)
//!     → headers.rs (Host handling, optional hop-by-hop stripping)
//!     → response.rs (errors before the upstream status is known)
//!     → relay.rs (stream upstream body to the caller)
//! ```

pub mod forward;
pub mod headers;
pub mod relay;
pub mod response;
pub mod server;

pub use forward::{Forwarder, HttpClient};
pub use relay::{RelayBody, TransferGuard, TransferTracker};
pub use response::GatewayError;
pub use server::GatewayServer;
