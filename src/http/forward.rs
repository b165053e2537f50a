//! The forwarding pipeline.
//!
//! One inbound request produces exactly one outbound request; nothing is
//! retried. Stages run strictly in order:
//!
//! ```text
//! resolve target → build outbound request → dispatch → relay status/headers → stream body
//! ```
//!
//! Cancellation is carried by ownership. If the caller goes away, hyper drops
//! the handler future (aborting connect / header wait) or the response body
//! (closing the upstream stream mid-transfer).

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Version},
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::{HopByHopPolicy, Origin, UpstreamConfig};
use crate::http::headers;
use crate::http::relay::{RelayBody, TransferTracker};
use crate::http::response::GatewayError;

/// Pooled outbound transport, shared by every request.
pub type HttpClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Maps inbound requests onto the origin and relays the result.
///
/// Cloning is cheap: the origin sits behind an `Arc` and the client shares
/// its pool between clones.
#[derive(Clone)]
pub struct Forwarder {
    origin: Arc<Origin>,
    client: HttpClient,
    hop_by_hop: HopByHopPolicy,
    response_timeout: Option<Duration>,
    transfers: TransferTracker,
}

impl Forwarder {
    pub fn new(origin: Origin, upstream: &UpstreamConfig, hop_by_hop: HopByHopPolicy) -> Self {
        Self {
            origin: Arc::new(origin),
            client: build_client(upstream),
            hop_by_hop,
            response_timeout: upstream.response_timeout_secs.map(Duration::from_secs),
            transfers: TransferTracker::new(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn transfers(&self) -> &TransferTracker {
        &self.transfers
    }

    /// Forward one inbound request and produce the response for the caller.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let method = request.method().clone();
        let inbound = request.uri().clone();

        match self.try_forward(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    method = %method,
                    uri = %inbound,
                    status = err.status().as_u16(),
                    error = %err,
                    "Forwarding failed"
                );
                err.into_response()
            }
        }
    }

    async fn try_forward(&self, request: Request<Body>) -> Result<Response, GatewayError> {
        let (mut parts, body) = request.into_parts();

        let target = self.origin.resolve_request_target(&parts.uri, parts.version)?;
        headers::prepare_request_headers(&mut parts.headers, self.hop_by_hop);

        tracing::debug!(method = %parts.method, target = %target, "Forwarding request");

        let mut outbound = Request::new(body);
        *outbound.method_mut() = parts.method;
        *outbound.uri_mut() = target.clone();
        *outbound.version_mut() = Version::HTTP_11;
        *outbound.headers_mut() = parts.headers;

        let guard = self.transfers.track();
        let pending = self.client.request(outbound);
        let result = match self.response_timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| GatewayError::UpstreamTimeout(limit))?,
            None => pending.await,
        };
        let response: Response<Incoming> = result.map_err(GatewayError::Upstream)?;

        let (mut parts, body) = response.into_parts();
        headers::prepare_response_headers(&mut parts.headers, self.hop_by_hop);

        tracing::debug!(
            status = parts.status.as_u16(),
            target = %target,
            elapsed_ms = guard.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        let body = Body::new(RelayBody::new(body, target, guard));
        Ok(Response::from_parts(parts, body))
    }
}

fn build_client(upstream: &UpstreamConfig) -> HttpClient {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(true);
    http.set_connect_timeout(Some(Duration::from_secs(upstream.connect_timeout_secs)));

    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .pool_idle_timeout(Duration::from_secs(upstream.pool_idle_timeout_secs))
        .pool_max_idle_per_host(upstream.pool_max_idle_per_host)
        .build(https)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn forwarder(origin: &str) -> Forwarder {
        Forwarder::new(
            Origin::parse(origin).unwrap(),
            &UpstreamConfig::default(),
            HopByHopPolicy::Preserve,
        )
    }

    #[tokio::test]
    async fn unresolvable_target_is_rejected_before_dispatch() {
        let forwarder = forwarder("http://backend.internal:9000/v1");
        let request = Request::builder()
            .uri("gopher://backend.internal/x")
            .body(Body::empty())
            .unwrap();

        let response = forwarder.forward(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(forwarder.transfers().active_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_origin_is_a_bad_gateway() {
        // Reserve a port, then free it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let forwarder = forwarder(&format!("http://{addr}/v1"));
        let request = Request::builder().uri("/models").body(Body::empty()).unwrap();

        let response = forwarder.forward(request).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!body.is_empty());
        assert_eq!(forwarder.transfers().active_count(), 0);
    }

    #[tokio::test]
    async fn clones_share_origin() {
        let a = forwarder("http://backend.internal:9000/v1");
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.origin, &b.origin));
        assert_eq!(b.origin().path_prefix(), "/v1");
    }
}
