//! Streaming relay of upstream response bodies.
//!
//! [`RelayBody`] hands upstream frames to the server one at a time, exactly as
//! the transport yields them, so memory use is bounded by a single frame.
//! It owns the upstream body: dropping it, for any reason, releases the
//! upstream connection. A [`TransferGuard`] rides along so the
//! [`TransferTracker`] count returns to its baseline on every exit path.

use std::fmt::Display;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use std::time::{Duration, Instant};

use axum::http::Uri;
use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};

/// Counts forwarding operations between dispatch and release of the upstream body.
#[derive(Debug, Clone, Default)]
pub struct TransferTracker {
    active: Arc<AtomicU64>,
}

impl TransferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new in-flight transfer. Returns a guard that decrements on drop.
    pub fn track(&self) -> TransferGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        TransferGuard {
            active: Arc::clone(&self.active),
            started: Instant::now(),
        }
    }

    /// Current in-flight transfer count.
    pub fn active_count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait until no transfer is in flight, giving up after `limit`.
    /// Returns whether the tracker drained.
    pub async fn wait_idle(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while self.active_count() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        true
    }
}

/// Guard for one in-flight transfer.
#[derive(Debug)]
pub struct TransferGuard {
    active: Arc<AtomicU64>,
    started: Instant,
}

impl TransferGuard {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Response body that relays an upstream body frame by frame.
pub struct RelayBody<B> {
    inner: Pin<Box<B>>,
    target: Uri,
    relayed: u64,
    finished: bool,
    guard: TransferGuard,
}

impl<B> RelayBody<B>
where
    B: Body<Data = Bytes>,
{
    pub fn new(inner: B, target: Uri, guard: TransferGuard) -> Self {
        let finished = inner.is_end_stream();
        Self {
            inner: Box::pin(inner),
            target,
            relayed: 0,
            finished,
            guard,
        }
    }
}

impl<B> Body for RelayBody<B>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match ready!(this.inner.as_mut().poll_frame(cx)) {
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    this.relayed += data.len() as u64;
                }
                if this.inner.is_end_stream() {
                    this.complete();
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Some(Err(err)) => {
                // Status and headers are already on the wire; the server
                // aborts the connection when it sees this error.
                this.finished = true;
                tracing::warn!(
                    target_uri = %this.target,
                    bytes = this.relayed,
                    elapsed_ms = this.guard.elapsed().as_millis() as u64,
                    error = %err,
                    "Upstream body failed mid-stream"
                );
                Poll::Ready(Some(Err(err)))
            }
            None => {
                this.complete();
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> RelayBody<B> {
    fn complete(&mut self) {
        if !self.finished {
            self.finished = true;
            tracing::debug!(
                target_uri = %self.target,
                bytes = self.relayed,
                elapsed_ms = self.guard.elapsed().as_millis() as u64,
                "Relay complete"
            );
        }
    }
}

impl<B> Drop for RelayBody<B> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                target_uri = %self.target,
                bytes = self.relayed,
                elapsed_ms = self.guard.elapsed().as_millis() as u64,
                "Relay dropped before the upstream body completed"
            );
        }
    }
}
