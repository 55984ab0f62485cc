//! Resolver seam

use std::net::SocketAddr;

/// Host and service lookup.
///
/// Implementations return every candidate address in preference order, or the
/// underlying resolver's diagnostic verbatim.
pub trait Resolve: Send + Sync {
    fn resolve(&self, host: &str, service: &str) -> Result<Vec<SocketAddr>, String>;
}
