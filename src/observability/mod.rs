//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events with structured fields
//!     → logging.rs (EnvFilter + fmt layer, pretty or JSON)
//!     → stdout
//! ```
//!
//! Per-request spans come from `tower_http::trace::TraceLayer` on the router.

pub mod logging;

pub use logging::init_logging;
