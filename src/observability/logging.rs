//! Structured logging.
//!
//! `RUST_LOG` takes precedence when set; otherwise the configured level
//! applies to this crate and to `tower_http`'s request spans.

use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::{LogFormat, ObservabilityConfig};

/// Build the filter for a configured level.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level.trim();
        // Anything that is not a bare level is a directive and used as written.
        match level.parse::<LevelFilter>() {
            Ok(level) => EnvFilter::new(format!("model_gateway={level},tower_http={level}")),
            Err(_) => EnvFilter::new(level),
        }
    })
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(build_filter(config));
    let result = match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };
    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_for(level: &str) -> Option<String> {
        // An ambient RUST_LOG overrides the configured level.
        if std::env::var_os("RUST_LOG").is_some() {
            return None;
        }
        let config = ObservabilityConfig {
            log_level: level.to_string(),
            ..Default::default()
        };
        Some(build_filter(&config).to_string())
    }

    #[test]
    fn plain_level_targets_gateway_and_trace_layer() {
        if let Some(filter) = filter_for("debug") {
            assert!(filter.contains("model_gateway=debug"));
            assert!(filter.contains("tower_http=debug"));
        }
    }

    #[test]
    fn bare_target_is_used_as_written() {
        if let Some(filter) = filter_for("hyper") {
            assert!(filter.starts_with("hyper"));
            assert!(!filter.contains("model_gateway"));
        }
    }

    #[test]
    fn directives_are_used_as_written() {
        if let Some(filter) = filter_for("warn,hyper=trace") {
            assert!(filter.contains("hyper=trace"));
            assert!(!filter.contains("model_gateway"));
        }
    }
}
