//! Configuration validation.
//!
//! Serde handles the syntax; this module checks the values. Validation is a
//! pure function that reports every problem found, not just the first, and
//! runs once before the gateway binds its listener.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::origin::{Origin, OriginError};
use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream origin is not set (use INFERENCE_URL, --origin or upstream.origin)")]
    MissingOrigin,

    #[error("upstream origin `{value}` is invalid: {reason}")]
    InvalidOrigin { value: String, reason: OriginError },

    #[error("listener bind address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("upstream.connect_timeout_secs must be greater than zero")]
    ZeroConnectTimeout,

    #[error("upstream.response_timeout_secs must be greater than zero when set")]
    ZeroResponseTimeout,

    #[error("observability.log_level `{0}` is not a valid filter directive")]
    InvalidLogLevel(String),
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.upstream.origin.as_deref().map(str::trim) {
        None | Some("") => errors.push(ValidationError::MissingOrigin),
        Some(value) => {
            if let Err(reason) = Origin::parse(value) {
                errors.push(ValidationError::InvalidOrigin {
                    value: value.to_string(),
                    reason,
                });
            }
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.upstream.response_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroResponseTimeout);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.upstream.origin = Some("http://backend.internal:9000/v1".into());
        config
    }

    #[test]
    fn accepts_minimal_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn missing_origin_is_rejected() {
        let mut config = valid();
        config.upstream.origin = None;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors.as_slice(), [ValidationError::MissingOrigin]));

        config.upstream.origin = Some("   ".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors.as_slice(), [ValidationError::MissingOrigin]));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = valid();
        config.upstream.origin = Some("ftp://files".into());
        config.listener.bind_address = "localhost".into();
        config.upstream.connect_timeout_secs = 0;
        config.upstream.response_timeout_secs = Some(0);
        config.observability.log_level = "model_gateway=verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::InvalidOrigin { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidBindAddress(_)));
    }
}
