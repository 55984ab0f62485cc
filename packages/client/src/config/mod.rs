//! Connection configuration
//!
//! [`ConnectConfig`] carries the knobs a caller sets once per account: the
//! I/O timeout, the line terminator of the protocol riding on the transport,
//! and the trust anchors used when a peer certificate must be verified.

mod timeouts;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use timeouts::{DEFAULT_TIMEOUT, MIN_TIMEOUT, clamp_timeout, duration_ms, option_duration_ms};

use crate::io::Eol;

/// Per-attempt connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Bound on every wait for data, except the TLS handshake.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
    /// Bound on each candidate TCP connect; falls back to `timeout`.
    #[serde(with = "option_duration_ms", skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<Duration>,
    /// Line terminator of the protocol spoken over the finished transport.
    pub eol: Eol,
    pub tls: TlsConfig,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            eol: Eol::Crlf,
            tls: TlsConfig::default(),
        }
    }
}

impl ConnectConfig {
    /// Bound on each candidate TCP connect when I/O uses the configured `timeout`.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout_for(self.timeout)
    }

    /// Bound on each candidate TCP connect for an attempt whose I/O timeout
    /// is `io_timeout`: the explicit `connect_timeout` if set, else `io_timeout`.
    pub fn connect_timeout_for(&self, io_timeout: Duration) -> Duration {
        clamp_timeout(self.connect_timeout.unwrap_or(io_timeout))
    }
}

/// Trust anchors for peer verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Use the operating system certificate store
    pub use_system_certs: bool,
    /// Use the bundled Mozilla roots (also used when the system store fails to load)
    pub use_webpki_roots: bool,
    /// Extra PEM-encoded root certificates
    pub custom_root_certs: Vec<String>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            use_system_certs: true,
            use_webpki_roots: false,
            custom_root_certs: Vec::new(),
        }
    }
}
