//! Buffered stream I/O
//!
//! [`BufferedIo`] is the read/wait/write layer every exchange in this crate
//! runs over: proxy negotiation on the raw proxy socket, and the mail
//! protocols above the finished [`crate::Transport`].

mod buffered;
mod eol;
mod prefixed;
#[cfg(test)]
pub(crate) mod scripted;
mod stream;

pub use buffered::{BufferedIo, MAX_LINE_LEN};
pub use eol::Eol;
pub use prefixed::PrefixedStream;
pub use stream::{Stream, TimedStream};
