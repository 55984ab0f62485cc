use std::error::Error as StdError;
use std::io;

use super::helpers::TimedOut;
use super::types::{Error, Kind};

impl Error {
    /// Returns true for malformed proxy URLs and oversized or unusable fields.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self.inner.kind, Kind::Config)
    }

    /// Returns true if host or service lookup failed.
    #[must_use]
    pub fn is_resolve(&self) -> bool {
        matches!(self.inner.kind, Kind::Resolve)
    }

    /// Returns true for connect, read and write failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.inner.kind, Kind::Transport)
    }

    /// Returns true if a proxy answered with something the protocol forbids.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self.inner.kind, Kind::Protocol)
    }

    /// Returns true for TLS handshake and certificate verification failures.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self.inner.kind, Kind::Tls)
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>()
                && matches!(io.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
            {
                return true;
            }
            source = err.source();
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::super::constructors;
    use std::io;

    #[test]
    fn transport_cause_names_the_operation() {
        let err = constructors::transport(
            "connect",
            io::Error::new(io::ErrorKind::ConnectionRefused, "Connection refused"),
        );
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "connect: Connection refused");
    }

    #[test]
    fn timeout_is_detected_through_the_source_chain() {
        assert!(constructors::timed_out().is_timeout());
        assert!(constructors::io(io::Error::from(io::ErrorKind::WouldBlock)).is_timeout());
        assert!(!constructors::protocol("bad protocol version: 4").is_timeout());
    }

    #[test]
    fn eof_maps_to_connection_closed() {
        let err = constructors::io(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(err.to_string(), "connection closed");
    }
}
