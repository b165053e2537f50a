//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all forwarding handler
//! - Serve HTTP/1.1 and HTTP/2 on a bound listener
//! - Wire up request tracing
//! - Stop accepting and drain on the shutdown signal

use axum::{
    body::Body,
    extract::{Request, State},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, Origin, OriginError};
use crate::http::forward::Forwarder;
use crate::http::relay::TransferTracker;

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    forwarder: Forwarder,
}

impl GatewayServer {
    /// Create a server from a validated configuration.
    ///
    /// The origin is parsed here, before any listener exists, so a bad origin
    /// can never reach the serving stage.
    pub fn new(config: &GatewayConfig) -> Result<Self, OriginError> {
        let raw = config.upstream.origin.as_deref().ok_or(OriginError::Empty)?;
        let origin = Origin::parse(raw)?;
        let forwarder = Forwarder::new(origin, &config.upstream, config.forwarding.hop_by_hop);

        tracing::info!(
            origin = %forwarder.origin(),
            hop_by_hop = ?config.forwarding.hop_by_hop,
            response_timeout_secs = ?config.upstream.response_timeout_secs,
            "Forwarder ready"
        );

        let router = Self::build_router(forwarder.clone());
        Ok(Self { router, forwarder })
    }

    /// Every method and every path goes to the same handler.
    fn build_router(forwarder: Forwarder) -> Router {
        Router::new()
            .route("/", any(forward_handler))
            .route("/{*path}", any(forward_handler))
            .with_state(forwarder)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// In-flight transfer counter shared with the forwarder.
    pub fn transfers(&self) -> TransferTracker {
        self.forwarder.transfers().clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, origin = %self.forwarder.origin(), "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!(
            in_flight = self.forwarder.transfers().active_count(),
            "HTTP server stopped"
        );
        Ok(())
    }
}

async fn forward_handler(State(forwarder): State<Forwarder>, request: Request<Body>) -> Response {
    forwarder.forward(request).await
}
