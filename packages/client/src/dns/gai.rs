//! System resolver
//!
//! Uses the platform's getaddrinfo through `std::net::ToSocketAddrs`. Both
//! IPv4 and IPv6 answers are returned in the order the system gives them.

use std::net::{SocketAddr, ToSocketAddrs};

use super::traits::Resolve;
use crate::endpoint::lookup_port;

#[derive(Debug, Default, Clone, Copy)]
pub struct GaiResolver;

impl GaiResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, host: &str, service: &str) -> Result<Vec<SocketAddr>, String> {
        let port = lookup_port(service).ok_or_else(|| format!("unknown service: {service}"))?;
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| e.to_string())?
            .collect();
        if addrs.is_empty() {
            return Err(format!("no addresses found for {host}"));
        }
        Ok(addrs)
    }
}
