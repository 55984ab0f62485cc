//! TLS-specific error types

use std::fmt;

use crate::error;

/// Direction a non-blocking handshake was waiting on when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Want {
    Read,
    Write,
}

impl fmt::Display for Want {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Want::Read => f.write_str("read"),
            Want::Write => f.write_str("write"),
        }
    }
}

/// Reasons a TLS session could not be established.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("root certificates: {0}")]
    RootStore(String),
    #[error("{op}: {detail}")]
    Setup { op: &'static str, detail: String },
    /// The handshake stopped waiting for the peer rather than failing outright.
    #[error("{op}: want {want}")]
    Stalled { op: &'static str, want: Want },
    #[error("{op}: {detail}")]
    Handshake { op: &'static str, detail: String },
    #[error("certificate verification failed: no certificate")]
    NoCertificate,
    #[error("certificate verification failed: {0}")]
    Verification(String),
}

impl From<TlsError> for error::Error {
    fn from(e: TlsError) -> Self {
        match e {
            TlsError::RootStore(_) => error::config(e.to_string()).with(e),
            _ => error::tls(e.to_string()).with(e),
        }
    }
}
