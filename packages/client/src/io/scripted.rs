//! In-memory stream for exercising exchanges without sockets

use std::io::{self, Cursor, Read, Write};
use std::time::Duration;

use super::{BufferedIo, Eol, TimedStream};

/// Reads come from a script, writes are captured.
pub(crate) struct Scripted {
    input: Cursor<Vec<u8>>,
    pub(crate) output: Vec<u8>,
}

impl Read for Scripted {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // one byte at a time to exercise reassembly
        let n = buf.len().min(1);
        self.input.read(&mut buf[..n])
    }
}

impl Write for Scripted {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl TimedStream for Scripted {
    fn set_read_timeout(&self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) fn scripted(input: &[u8]) -> BufferedIo<Scripted> {
    BufferedIo::new(
        Scripted {
            input: Cursor::new(input.to_vec()),
            output: Vec::new(),
        },
        Eol::Crlf,
        Duration::from_secs(5),
    )
}
