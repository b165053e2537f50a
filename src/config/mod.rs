//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse, apply flag / INFERENCE_URL overrides)
//!     → validation.rs (semantic checks, all errors at once)
//!     → GatewayConfig (validated, immutable)
//!     → origin.rs parses the Origin once, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults except the origin, which must come from somewhere
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod origin;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, parse_config, ConfigError, ConfigOverrides};
pub use origin::{Origin, OriginError, ResolveError};
pub use schema::{
    ForwardingConfig, GatewayConfig, HopByHopPolicy, ListenerConfig, LogFormat,
    ObservabilityConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
