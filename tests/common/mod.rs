//! Shared utilities for integration and failure-injection tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, Method, Uri},
    Router,
};
use model_gateway::config::GatewayConfig;
use model_gateway::http::{GatewayServer, TransferTracker};
use model_gateway::lifecycle::Shutdown;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A gateway running on an ephemeral port. Shuts down when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub transfers: TransferTracker,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_gateway(origin: &str) -> TestGateway {
    spawn_gateway_with(origin, |_| {}).await
}

pub async fn spawn_gateway_with(origin: &str, tweak: impl FnOnce(&mut GatewayConfig)) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.upstream.origin = Some(origin.to_string());
    config.listener.bind_address = "127.0.0.1:0".into();
    tweak(&mut config);

    let server = GatewayServer::new(&config).unwrap();
    let transfers = server.transfers();
    let listener = model_gateway::net::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    TestGateway {
        addr,
        transfers,
        shutdown,
    }
}

/// Serve an axum router as a mock upstream on an ephemeral port.
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// What a recording upstream saw.
#[derive(Debug)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Upstream that records every request and answers `200 recorded`.
pub async fn spawn_recording_upstream() -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().fallback(record).with_state(tx);
    (spawn_upstream(router).await, rx)
}

async fn record(State(tx): State<mpsc::UnboundedSender<Captured>>, request: Request) -> &'static str {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let _ = tx.send(Captured {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });
    "recorded"
}

/// Start a raw TCP upstream; `handler` owns each accepted socket.
pub async fn spawn_raw_upstream<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = std::sync::Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move { handler(socket).await });
        }
    });
    addr
}

/// Read until the end of an HTTP request head.
pub async fn read_request_head(socket: &mut TcpStream) -> Vec<u8> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    head
}

/// An address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A client that never pools, so each test request opens its own connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// An HTTP/2 prior-knowledge (h2c) client; `host` resolves to `addr`.
pub fn h2c_client(host: &str, addr: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .http2_prior_knowledge()
        .no_proxy()
        .resolve(host, addr)
        .build()
        .unwrap()
}
