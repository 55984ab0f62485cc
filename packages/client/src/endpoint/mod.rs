//! Network destinations
//!
//! An [`Endpoint`] names a server by host and port (or service name), records
//! whether TLS is spoken directly and whether the peer certificate is checked,
//! and carries the resolver's answer once one has been obtained.

mod services;

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

pub use services::{lookup_port, service_port};

/// A resolvable network destination.
///
/// The address cache is filled on the first successful resolution and reused
/// by every later attempt against the same endpoint. Clearing it after a
/// failure is left to the owner ([`Endpoint::forget_addrs`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    /// Decimal port or symbolic service name (`"imaps"`, `"socks"`, ...)
    pub port: String,
    /// Speak TLS as soon as the stream to this endpoint exists.
    #[serde(default)]
    pub tls: bool,
    /// Reject the TLS peer unless its certificate chain validates.
    #[serde(default)]
    pub verify: bool,
    #[serde(skip)]
    addrs: Option<Vec<SocketAddr>>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            tls: false,
            verify: false,
            addrs: None,
        }
    }

    #[must_use]
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Cached resolver answer, if any.
    pub fn addrs(&self) -> Option<&[SocketAddr]> {
        self.addrs.as_deref()
    }

    pub(crate) fn cache_addrs(&mut self, addrs: Vec<SocketAddr>) {
        self.addrs = Some(addrs);
    }

    /// Drop the cached addresses so the next attempt resolves again.
    pub fn forget_addrs(&mut self) {
        self.addrs = None;
    }

    /// Numeric port for this endpoint, consulting the service table first.
    pub fn port_number(&self) -> Option<u16> {
        lookup_port(&self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
