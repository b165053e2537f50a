//! Header propagation between the caller and the origin.
//!
//! The default policy is a verbatim copy in both directions. `Host` is the
//! one request header that is never copied: the transport derives it from the
//! resolved target so the origin sees its own authority.

use axum::http::{header, HeaderMap, HeaderName};

use crate::config::HopByHopPolicy;

/// Connection-scoped headers a conforming intermediary does not forward.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Prepare inbound headers for the outbound request, in place.
pub fn prepare_request_headers(headers: &mut HeaderMap, policy: HopByHopPolicy) {
    headers.remove(header::HOST);
    if policy == HopByHopPolicy::Strip {
        strip_hop_by_hop(headers);
    }
}

/// Prepare upstream response headers for the caller, in place.
pub fn prepare_response_headers(headers: &mut HeaderMap, policy: HopByHopPolicy) {
    if policy == HopByHopPolicy::Strip {
        strip_hop_by_hop(headers);
    }
}

/// Remove the standard hop-by-hop headers and any header nominated by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let nominated: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    for name in &nominated {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}
