//! Upstream origin and request-target resolution.
//!
//! The origin is parsed once at startup and never mutated; every request
//! handler resolves its inbound target against the same shared value.
//!
//! # Resolution rules
//! - References with a scheme replace the origin entirely.
//! - Authority-relative references (`//host/path`) keep the origin scheme.
//! - Relative-path, query-only and fragment-only references merge with the
//!   origin URL as written (RFC 3986 section 5.2).
//! - Absolute-path references, and every origin-form request target, are
//!   mounted under the origin path prefix after dot-segment removal, so the
//!   mount point cannot be escaped with `..`.

use std::fmt;

use axum::http::{uri::InvalidUri, Uri, Version};
use url::Url;

/// Error raised while parsing the configured origin.
#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    #[error("no upstream origin configured")]
    Empty,

    #[error("origin is not a valid absolute URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("origin scheme `{0}` is not supported (expected http or https)")]
    UnsupportedScheme(String),

    #[error("origin has no host")]
    MissingHost,
}

/// Error raised while mapping an inbound target onto the origin.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve `{reference}` against the origin: {cause}")]
    Join {
        reference: String,
        cause: url::ParseError,
    },

    #[error("target `{0}` uses an unsupported scheme")]
    UnsupportedScheme(String),

    #[error("target `{target}` is not a valid request URI: {cause}")]
    InvalidUri { target: String, cause: InvalidUri },
}

/// The fixed upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    base: Url,
    /// Origin path without its trailing slash; empty when mounted at the root.
    prefix: String,
}

impl Origin {
    /// Parse and validate an origin URL.
    pub fn parse(raw: &str) -> Result<Self, OriginError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(OriginError::Empty);
        }

        let base = Url::parse(raw)?;
        match base.scheme() {
            "http" | "https" => {}
            other => return Err(OriginError::UnsupportedScheme(other.to_string())),
        }
        if base.host_str().map_or(true, str::is_empty) {
            return Err(OriginError::MissingHost);
        }

        let prefix = base.path().trim_end_matches('/').to_string();
        Ok(Self { base, prefix })
    }

    /// Path prefix every origin-form target is mounted under.
    pub fn path_prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a URL reference against the origin.
    pub fn resolve(&self, reference: &str) -> Result<Url, ResolveError> {
        if is_absolute_path(reference) {
            return Ok(self.mount(reference));
        }

        let target = self.base.join(reference).map_err(|cause| ResolveError::Join {
            reference: reference.to_string(),
            cause,
        })?;

        match target.scheme() {
            "http" | "https" => Ok(target),
            _ => Err(ResolveError::UnsupportedScheme(target.to_string())),
        }
    }

    /// Resolve the target of an inbound request into the outbound request URI.
    ///
    /// Origin-form targets are always treated as paths, so a request for
    /// `//other-host/x` stays on the origin instead of switching authority.
    /// Only an HTTP/1.x absolute-form request line can override the origin.
    /// HTTP/2 and later always carry `:scheme` and `:authority`, which name
    /// the gateway itself, so only their path and query are used.
    pub fn resolve_request_target(&self, uri: &Uri, version: Version) -> Result<Uri, ResolveError> {
        let absolute_form = matches!(
            version,
            Version::HTTP_09 | Version::HTTP_10 | Version::HTTP_11
        );
        let target = match (uri.scheme(), uri.path_and_query()) {
            (Some(_), _) if absolute_form => self.resolve(&uri.to_string())?,
            (Some(_), Some(pq)) => self.mount(pq.as_str()),
            (Some(_), None) => self.mount("/"),
            (None, Some(pq)) if pq.as_str().starts_with('/') => self.mount(pq.as_str()),
            (None, Some(pq)) => self.resolve(pq.as_str())?,
            (None, None) => self.mount("/"),
        };
        to_request_uri(target)
    }

    fn mount(&self, reference: &str) -> Url {
        let (rest, fragment) = match reference.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (reference, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let mut target = self.base.clone();
        // Normalizes dot segments before the prefix is applied.
        target.set_path(path);
        if !self.prefix.is_empty() {
            let mounted = format!("{}{}", self.prefix, target.path());
            target.set_path(&mounted);
        }
        target.set_query(query);
        target.set_fragment(fragment);
        target
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt(f)
    }
}

fn is_absolute_path(reference: &str) -> bool {
    reference.starts_with('/') && !reference.starts_with("//") && !reference.starts_with("/\\")
}

/// Fragments never go on the wire.
fn to_request_uri(mut target: Url) -> Result<Uri, ResolveError> {
    target.set_fragment(None);
    Uri::try_from(target.as_str()).map_err(|cause| ResolveError::InvalidUri {
        target: target.to_string(),
        cause,
    })
}
