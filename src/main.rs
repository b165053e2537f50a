//! Model Gateway
//!
//! A transparent forwarding gateway built with Tokio, Axum and hyper.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 MODEL GATEWAY                 │
//!   Client Request     │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ───────────────────┼─▶│   net   │──▶│  http   │──▶│  forward   │  │
//!                      │  │listener │   │ server  │   │ (resolve)  │──┼──▶ Origin
//!                      │  └─────────┘   └─────────┘   └─────┬──────┘  │
//!   Client Response    │                ┌─────────┐         │         │
//!   ◀──────────────────┼────────────────│  relay  │◀────────┘◀────────┼─── Origin
//!                      │                │ (stream)│                   │
//!                      │                └─────────┘                   │
//!                      │  config · lifecycle · observability          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use model_gateway::config::{self, ConfigOverrides, ObservabilityConfig};
use model_gateway::lifecycle;
use model_gateway::observability::init_logging;

#[derive(Parser)]
#[command(name = "model-gateway")]
#[command(about = "Transparent forwarding gateway for an inference backend", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream origin URL every request is forwarded to.
    #[arg(long, env = "INFERENCE_URL")]
    origin: Option<String>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level or filter directive.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config,
            origin: self.origin,
            bind_address: self.listen,
            log_level: self.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let overrides = Cli::parse().overrides();

    let config = match config::load(&overrides) {
        Ok(config) => config,
        Err(err) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        "model-gateway starting"
    );

    match lifecycle::launch(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Gateway terminated");
            ExitCode::FAILURE
        }
    }
}
