//! Startup orchestration.
//!
//! Ordered: the origin is parsed and the forwarder built first, the listener
//! binds last, and any failure along the way is fatal.

use crate::config::{GatewayConfig, OriginError};
use crate::http::GatewayServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid upstream origin: {0}")]
    Origin(#[from] OriginError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the gateway and serve until a termination signal arrives.
pub async fn launch(config: GatewayConfig) -> Result<(), StartupError> {
    let server = GatewayServer::new(&config)?;
    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    let signals = shutdown.trigger_on_signal();

    let result = server.run(listener, stop).await;
    signals.abort();
    Ok(result?)
}
