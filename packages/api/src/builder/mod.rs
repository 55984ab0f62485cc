//! Fluent dial builder
//!
//! Describe the target, the optional proxy and the transport settings, then
//! call [`DialBuilder::connect`].

pub mod core;
pub mod execute;
pub mod proxy;
pub mod target;

pub use core::*;
