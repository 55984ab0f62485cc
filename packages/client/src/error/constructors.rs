use std::io;

use super::helpers::{ConnectionClosed, TimedOut, op_cause};
use super::types::{Error, Kind};

/// Creates an `Error` for a configuration or format problem.
pub fn config(cause: impl Into<String>) -> Error {
    Error::new(Kind::Config, cause)
}

/// Creates an `Error` carrying the resolver's own diagnostic.
pub fn resolve(cause: impl Into<String>) -> Error {
    Error::new(Kind::Resolve, cause)
}

/// Creates an `Error` for a failed socket operation, rendered as
/// `"<op>: <system error>"`.
pub fn transport(op: &str, err: io::Error) -> Error {
    Error::new(Kind::Transport, op_cause(op, &err)).with(err)
}

/// Creates an `Error` for a wait that ran past its deadline.
pub fn timed_out() -> Error {
    Error::new(Kind::Transport, TimedOut.to_string()).with(TimedOut)
}

/// Creates an `Error` for a peer that closed the connection mid-exchange.
pub fn connection_closed() -> Error {
    Error::new(Kind::Transport, ConnectionClosed.to_string()).with(ConnectionClosed)
}

/// Creates an `Error` for a read or write failure on an established stream.
pub fn io(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => timed_out(),
        io::ErrorKind::UnexpectedEof => connection_closed(),
        _ => Error::new(Kind::Transport, err.to_string()).with(err),
    }
}

/// Creates an `Error` for a peer that violated the proxy protocol.
pub fn protocol(cause: impl Into<String>) -> Error {
    Error::new(Kind::Protocol, cause)
}

/// Creates an `Error` for a TLS session failure.
pub fn tls(cause: impl Into<String>) -> Error {
    Error::new(Kind::Tls, cause)
}
