//! TCP socket configuration
//!
//! Puts a freshly connected socket into the mode the transport expects:
//! blocking calls bounded by the operation timeout, no Nagle delay.

use std::net::TcpStream;
use std::time::Duration;

use crate::config::clamp_timeout;
use crate::error::{self, Result};

/// Configure a connected socket for timed line-oriented I/O.
pub fn configure_tcp_socket(stream: &TcpStream, timeout: Duration) -> Result<()> {
    stream
        .set_nodelay(true)
        .map_err(|e| error::transport("nodelay", e))?;
    let timeout = Some(clamp_timeout(timeout));
    stream
        .set_read_timeout(timeout)
        .map_err(|e| error::transport("read timeout", e))?;
    stream
        .set_write_timeout(timeout)
        .map_err(|e| error::transport("write timeout", e))?;
    Ok(())
}
