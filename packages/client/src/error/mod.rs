//! Error types for connection attempts

pub mod classification;
pub mod constructors;
pub mod helpers;
pub mod types;

pub use constructors::*;
pub use helpers::{ConnectionClosed, TimedOut};
pub use types::{Error, Inner, Kind, Result};
