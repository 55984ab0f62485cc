//! Proxy URL parsing
//!
//! Accepts `scheme://[user:pass@]host[:port]` with scheme one of `http`,
//! `https`, `socks` or `socks5`. No network I/O happens here.

use super::types::{Credentials, Proxy, ProxyKind};
use crate::endpoint::Endpoint;
use crate::error;

const SCHEMES: &[(&str, ProxyKind)] = &[
    ("http://", ProxyKind::Http),
    ("https://", ProxyKind::Https),
    ("socks://", ProxyKind::Socks5),
    ("socks5://", ProxyKind::Socks5),
];

/// Reasons a proxy URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyUrlError {
    #[error("unknown proxy type: {0}")]
    UnknownScheme(String),
    #[error("missing proxy host")]
    MissingHost,
    #[error("invalid proxy credentials")]
    BadCredentials,
    #[error("missing proxy port")]
    MissingPort,
    #[error("HTTP proxy authentication is not supported")]
    HttpAuthUnsupported,
}

impl From<ProxyUrlError> for error::Error {
    fn from(e: ProxyUrlError) -> Self {
        error::config(e.to_string()).with(e)
    }
}

/// Parse a proxy URL into a [`Proxy`].
pub fn parse_proxy_url(url: &str) -> Result<Proxy, ProxyUrlError> {
    let (rest, kind) = SCHEMES
        .iter()
        .find_map(|&(prefix, kind)| url.strip_prefix(prefix).map(|rest| (rest, kind)))
        .ok_or_else(|| ProxyUrlError::UnknownScheme(url.to_string()))?;

    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        return Err(ProxyUrlError::MissingHost);
    }

    let (credentials, rest) = match rest.find('@') {
        Some(at) => {
            let colon = rest.find(':').ok_or(ProxyUrlError::BadCredentials)?;
            if colon >= at {
                return Err(ProxyUrlError::BadCredentials);
            }
            let credentials = Credentials::new(&rest[..colon], &rest[colon + 1..at])
                .ok_or(ProxyUrlError::BadCredentials)?;
            (Some(credentials), &rest[at + 1..])
        }
        None => (None, rest),
    };

    let (host, port) = match rest.split_once(':') {
        Some((_, "")) => return Err(ProxyUrlError::MissingPort),
        Some((host, port)) => (host, port),
        None => (rest, kind.default_port()),
    };
    if host.is_empty() {
        return Err(ProxyUrlError::MissingHost);
    }

    tracing::debug!(
        target: "proxyconn::proxy",
        scheme = kind.scheme(),
        host,
        port,
        auth = credentials.is_some(),
        "parsed proxy url"
    );

    match kind {
        ProxyKind::Http | ProxyKind::Https if credentials.is_some() => {
            Err(ProxyUrlError::HttpAuthUnsupported)
        }
        ProxyKind::Http => Ok(Proxy::Http {
            server: Endpoint::new(host, port),
        }),
        ProxyKind::Https => Ok(Proxy::Https {
            server: Endpoint::new(host, port).with_tls(true),
        }),
        ProxyKind::Socks5 => Ok(Proxy::Socks5 {
            server: Endpoint::new(host, port),
            credentials,
        }),
    }
}
