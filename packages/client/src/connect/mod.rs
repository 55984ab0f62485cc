//! Connection establishment
//!
//! [`Connector`] drives a whole attempt; the [`tcp`] module holds the
//! individual steps it is built from.

pub mod tcp;
mod types;

pub use types::{Connector, Transport};
