//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (parse address, bind TCP socket)
//!     → Hand off to HTTP layer (axum::serve)
//! ```
//!
//! # Design Decisions
//! - Binding happens after the origin is validated, so an invalid origin
//!   never opens a port
//! - Bind failures are startup errors, never retried

pub mod listener;

pub use listener::{bind, ListenerError};
