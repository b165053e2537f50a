//! Error responses synthesized by the gateway.
//!
//! Only failures that happen before the upstream status line is available
//! become responses here. Once a relay has started, errors stay on the body
//! (see `relay.rs`).
//!
//! - Unresolvable targets → 400 Bad Request
//! - Upstream unreachable (DNS, connect, TLS) → 502 Bad Gateway
//! - Upstream headers not received in time → 504 Gateway Timeout

use std::error::Error as StdError;
use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy;

use crate::config::ResolveError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidTarget(#[from] ResolveError),

    #[error("{}", describe(.0))]
    Upstream(#[source] legacy::Error),

    #[error("upstream did not send response headers within {0:?}")]
    UpstreamTimeout(Duration),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let mut body = self.to_string();
        body.push('\n');
        (
            self.status(),
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            body,
        )
            .into_response()
    }
}

/// Render an error together with its source chain, skipping causes whose
/// text is already part of the message.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
