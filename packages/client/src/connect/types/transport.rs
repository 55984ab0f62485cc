//! Established connection handle

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{self, Result};
use crate::io::{BufferedIo, Eol, Stream};

/// A connected, fully negotiated byte stream to the target.
///
/// Proxy tunnels are already open and TLS, when requested, is established.
/// Every read waits at most [`Transport::timeout`]. Dropping the transport
/// closes the socket; [`Transport::close`] also says goodbye to each TLS
/// layer first.
#[derive(Debug)]
pub struct Transport {
    io: BufferedIo<Stream>,
}

impl Transport {
    pub(crate) fn new(io: BufferedIo<Stream>) -> Self {
        Self { io }
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.io.write(buf)
    }

    /// Write `line` and the transport's line terminator.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.io.write_line(line)
    }

    /// Read one line of text, without its terminator.
    ///
    /// Fails with a protocol error if the line is not valid UTF-8.
    pub fn read_line(&mut self) -> Result<String> {
        self.io.read_line()
    }

    /// Read one line as raw bytes, without its terminator.
    pub fn read_line_bytes(&mut self) -> Result<Bytes> {
        self.io.read_line_bytes()
    }

    /// Read at least one byte into `buf`.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.io.read(buf)
    }

    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        self.io.read_exact(n)
    }

    /// Wait until at least `n` bytes are buffered.
    pub fn wait(&mut self, n: usize) -> Result<()> {
        self.io.wait(n)
    }

    pub fn buffered(&self) -> &[u8] {
        self.io.buffered()
    }

    pub fn eol(&self) -> Eol {
        self.io.eol()
    }

    pub fn set_eol(&mut self, eol: Eol) {
        self.io.set_eol(eol);
    }

    pub fn timeout(&self) -> Duration {
        self.io.timeout()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.io.set_timeout(timeout);
    }

    /// Address of the peer at the bottom socket: the proxy when one is used.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.io
            .get_ref()
            .tcp()
            .peer_addr()
            .map_err(|e| error::transport("getpeername", e))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.io
            .get_ref()
            .tcp()
            .local_addr()
            .map_err(|e| error::transport("getsockname", e))
    }

    pub fn is_tls(&self) -> bool {
        self.io.get_ref().is_tls()
    }

    /// The buffered stream underneath, for protocol code that drives I/O
    /// itself.
    pub fn io_mut(&mut self) -> &mut BufferedIo<Stream> {
        &mut self.io
    }

    /// Shut the connection down, sending close_notify on each TLS layer.
    pub fn close(mut self) -> Result<()> {
        match self.io.get_mut().shutdown() {
            Ok(()) => Ok(()),
            // already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(error::transport("shutdown", e)),
        }
    }
}
