//! Basic TCP connection establishment
//!
//! Walks a resolved address list in order and returns the first socket that
//! connects. When every candidate fails, the error carries the operation
//! and reason of the last attempt.

use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::config::clamp_timeout;
use crate::error::{self, Result};

/// Connect to the first reachable address, each attempt bounded by `timeout`.
pub fn connect_to_address_list(
    addrs: &[SocketAddr],
    timeout: Option<Duration>,
) -> Result<TcpStream> {
    let mut last: Option<(&'static str, io::Error)> = None;

    for addr in addrs {
        match connect_one(addr, timeout) {
            Ok(stream) => {
                tracing::debug!(target: "proxyconn::connect", %addr, "connected");
                return Ok(stream);
            }
            Err((op, e)) => {
                tracing::debug!(target: "proxyconn::connect", %addr, op, error = %e, "candidate failed");
                last = Some((op, e));
            }
        }
    }

    Err(match last {
        Some((op, e)) => error::transport(op, e),
        None => error::transport(
            "connect",
            io::Error::new(io::ErrorKind::InvalidInput, "no addresses to connect to"),
        ),
    })
}

fn connect_one(
    addr: &SocketAddr,
    timeout: Option<Duration>,
) -> std::result::Result<TcpStream, (&'static str, io::Error)> {
    let socket = Socket::new(Domain::for_address(*addr), Type::STREAM, Some(Protocol::TCP))
        .map_err(|e| ("socket", e))?;
    let target = SockAddr::from(*addr);
    match timeout {
        Some(t) => socket.connect_timeout(&target, clamp_timeout(t)),
        None => socket.connect(&target),
    }
    .map_err(|e| ("connect", e))?;
    Ok(socket.into())
}
