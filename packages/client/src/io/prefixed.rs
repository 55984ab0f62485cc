//! Replay of already-buffered bytes
//!
//! Bytes a proxy sends right after its final reply may already sit in the
//! negotiation buffer when the TLS session starts. [`PrefixedStream`] yields
//! them before reading from the socket again.

use std::io::{self, Read, Write};
use std::time::Duration;

use bytes::{Buf, Bytes};

use super::stream::TimedStream;

/// A stream wrapper that yields a prefetched prefix before reading from the inner stream.
#[derive(Debug)]
pub struct PrefixedStream<S> {
    prefix: Bytes,
    inner: S,
}

impl<S> PrefixedStream<S> {
    pub fn new(prefix: Bytes, inner: S) -> Self {
        Self { prefix, inner }
    }

    /// Returns the remaining unread prefix bytes.
    pub fn prefix_remaining(&self) -> usize {
        self.prefix.len()
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes the wrapper, returning the inner stream.
    ///
    /// Any unread prefix bytes are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Read> Read for PrefixedStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.prefix.has_remaining() {
            let n = self.prefix.len().min(buf.len());
            buf[..n].copy_from_slice(&self.prefix[..n]);
            self.prefix.advance(n);
            return Ok(n);
        }
        self.inner.read(buf)
    }
}

impl<S: Write> Write for PrefixedStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S: TimedStream> TimedStream for PrefixedStream<S> {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.inner.set_read_timeout(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_read_before_inner() {
        let inner = io::Cursor::new(b" world".to_vec());
        let mut stream = PrefixedStream::new(Bytes::from_static(b"hello"), inner);

        let mut first = [0u8; 3];
        assert_eq!(stream.read(&mut first).expect("read"), 3);
        assert_eq!(&first, b"hel");
        assert_eq!(stream.prefix_remaining(), 2);

        let mut rest = String::new();
        stream.read_to_string(&mut rest).expect("read");
        assert_eq!(rest, "lo world");
    }
}
