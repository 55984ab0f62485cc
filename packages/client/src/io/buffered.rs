//! Read buffering with per-operation deadlines

use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use bytes::{Buf, Bytes, BytesMut};

use super::eol::Eol;
use super::stream::TimedStream;
use crate::error::{self, Result};

/// Longest line [`BufferedIo::read_line_bytes`] accepts before giving up.
pub const MAX_LINE_LEN: usize = 64 * 1024;

const READ_CHUNK: usize = 4096;

/// Buffered reader/writer over a [`TimedStream`].
///
/// Every wait is bounded by the configured timeout, measured from the start
/// of that wait.
#[derive(Debug)]
pub struct BufferedIo<S> {
    stream: S,
    rbuf: BytesMut,
    eol: Eol,
    timeout: Duration,
}

impl<S: TimedStream> BufferedIo<S> {
    pub fn new(stream: S, eol: Eol, timeout: Duration) -> Self {
        Self {
            stream,
            rbuf: BytesMut::with_capacity(READ_CHUNK),
            eol,
            timeout,
        }
    }

    pub fn eol(&self) -> Eol {
        self.eol
    }

    pub fn set_eol(&mut self, eol: Eol) {
        self.eol = eol;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Bytes received but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.rbuf
    }

    /// Split into the stream and whatever is still buffered.
    pub fn into_parts(self) -> (S, Bytes) {
        (self.stream, self.rbuf.freeze())
    }

    /// Write all of `buf` and flush.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.stream.write_all(buf).map_err(error::io)?;
        self.stream.flush().map_err(error::io)
    }

    /// Write `line` followed by the line terminator. An empty line writes the
    /// terminator alone.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let eol = self.eol.as_bytes();
        let mut buf = Vec::with_capacity(line.len() + eol.len());
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(eol);
        self.write(&buf)
    }

    /// Block until at least `n` bytes are buffered.
    pub fn wait(&mut self, n: usize) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        while self.rbuf.len() < n {
            self.fill(deadline)?;
        }
        Ok(())
    }

    /// Wait for and consume exactly `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        self.wait(n)?;
        Ok(self.rbuf.split_to(n).freeze())
    }

    /// Wait for and consume exactly `N` bytes into a fixed array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.wait(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.rbuf.split_to(N));
        Ok(out)
    }

    /// Read whatever is available into `buf`, waiting for at least one byte.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.wait(1)?;
        let n = buf.len().min(self.rbuf.len());
        buf[..n].copy_from_slice(&self.rbuf.split_to(n));
        Ok(n)
    }

    /// Wait for a complete line and return it as text, without its terminator.
    ///
    /// A line that is not valid UTF-8 is a protocol error and is consumed;
    /// use [`BufferedIo::read_line_bytes`] for 8-bit data.
    pub fn read_line(&mut self) -> Result<String> {
        let line = self.read_line_bytes()?;
        String::from_utf8(line.to_vec())
            .map_err(|e| error::protocol(format!("invalid utf-8 in line: {}", e.utf8_error())))
    }

    /// Wait for a complete line and return its raw bytes, without its terminator.
    pub fn read_line_bytes(&mut self) -> Result<Bytes> {
        let deadline = Instant::now() + self.timeout;
        let eol = self.eol.as_bytes();
        let mut scanned = 0;
        loop {
            if let Some(pos) = find(&self.rbuf[scanned..], eol) {
                let end = scanned + pos;
                let line = self.rbuf.split_to(end).freeze();
                self.rbuf.advance(eol.len());
                return Ok(line);
            }
            if self.rbuf.len() > MAX_LINE_LEN {
                return Err(error::protocol("line too long"));
            }
            // the terminator may straddle two reads
            scanned = self.rbuf.len().saturating_sub(eol.len() - 1);
            self.fill(deadline)?;
        }
    }

    fn fill(&mut self, deadline: Instant) -> Result<()> {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
            .ok_or_else(error::timed_out)?;
        self.stream
            .set_read_timeout(Some(remaining))
            .map_err(error::io)?;

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(error::connection_closed()),
                Ok(n) => {
                    self.rbuf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(error::io(e)),
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::scripted::scripted;

    #[test]
    fn lines_split_on_the_configured_terminator() {
        let mut io = scripted(b"first\r\nsecond\nstill second\r\n\r\n");
        assert_eq!(io.read_line().expect("line"), "first");
        assert_eq!(io.read_line().expect("line"), "second\nstill second");
        assert_eq!(io.read_line().expect("line"), "");
    }

    #[test]
    fn eight_bit_lines_keep_their_bytes() {
        let mut io = scripted(b"Subject: caf\xe9\r\nnext\r\n");
        assert_eq!(&io.read_line_bytes().expect("line")[..], b"Subject: caf\xe9");
        assert_eq!(io.read_line().expect("line"), "next");
    }

    #[test]
    fn text_lines_reject_invalid_utf8() {
        let mut io = scripted(b"Subject: caf\xe9\r\nnext\r\n");
        let err = io.read_line().expect_err("latin-1");
        assert!(err.is_protocol());
        assert!(err.to_string().starts_with("invalid utf-8 in line"), "{err}");
        assert_eq!(io.read_line().expect("line"), "next");
    }

    #[test]
    fn exact_reads_leave_the_rest_buffered() {
        let mut io = scripted(b"\x05\x00tail");
        assert_eq!(io.read_array::<2>().expect("two bytes"), [5, 0]);
        io.wait(4).expect("tail");
        assert_eq!(io.buffered(), b"tail");
        let (_, rest) = io.into_parts();
        assert_eq!(&rest[..], b"tail");
    }

    #[test]
    fn eof_before_enough_bytes_is_connection_closed() {
        let mut io = scripted(b"\x05");
        let err = io.wait(2).expect_err("short read");
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "connection closed");
    }

    #[test]
    fn write_line_appends_terminator() {
        let mut io = scripted(b"");
        io.write_line("CONNECT a:1 HTTP/1.1").expect("write");
        io.write_line("").expect("write");
        assert_eq!(io.get_ref().output, b"CONNECT a:1 HTTP/1.1\r\n\r\n");
    }
}
