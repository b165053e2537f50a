//! Configuration loading from disk, environment and command line.
//!
//! Precedence, highest first: explicit overrides (command-line flags and
//! `INFERENCE_URL`, which clap folds into the same field), the TOML file,
//! then schema defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied outside the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub origin: Option<String>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

/// Parse configuration text without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the effective configuration: file (if any), then overrides, then validation.
pub fn load(overrides: &ConfigOverrides) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &overrides.config_path {
        Some(path) => read_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_overrides(&mut config, overrides);
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        origin = config.upstream.origin.as_deref().unwrap_or_default(),
        bind_address = %config.listener.bind_address,
        "Configuration resolved"
    );
    Ok(config)
}

fn read_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

fn apply_overrides(config: &mut GatewayConfig, overrides: &ConfigOverrides) {
    if let Some(origin) = &overrides.origin {
        config.upstream.origin = Some(origin.clone());
    }
    if let Some(bind_address) = &overrides.bind_address {
        config.listener.bind_address = bind_address.clone();
    }
    if let Some(level) = &overrides.log_level {
        config.observability.log_level = level.clone();
    }
}
