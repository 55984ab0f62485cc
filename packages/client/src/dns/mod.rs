//! Address resolution
//!
//! Resolves an [`Endpoint`] once and caches the candidate list on it; later
//! attempts against the same endpoint reuse the cache without consulting the
//! resolver again.

mod gai;
mod traits;

use std::net::SocketAddr;

pub use gai::GaiResolver;
pub use traits::Resolve;

use crate::endpoint::Endpoint;
use crate::error::{self, Result};

/// Candidate addresses for `endpoint`, resolving only on a cache miss.
pub fn resolve_endpoint<'a>(
    endpoint: &'a mut Endpoint,
    resolver: &dyn Resolve,
) -> Result<&'a [SocketAddr]> {
    if endpoint.addrs().is_none() {
        let addrs = resolver
            .resolve(&endpoint.host, &endpoint.port)
            .map_err(error::resolve)?;
        if addrs.is_empty() {
            return Err(error::resolve(format!(
                "no addresses found for {}",
                endpoint.host
            )));
        }
        tracing::debug!(
            target: "proxyconn::dns",
            endpoint = %endpoint,
            count = addrs.len(),
            "resolved endpoint"
        );
        endpoint.cache_addrs(addrs);
    }

    endpoint
        .addrs()
        .ok_or_else(|| error::resolve(format!("no addresses found for {}", endpoint.host)))
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counting {
        calls: AtomicUsize,
    }

    impl Resolve for Counting {
        fn resolve(&self, _host: &str, _service: &str) -> std::result::Result<Vec<SocketAddr>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SocketAddr::from((Ipv4Addr::LOCALHOST, 993))])
        }
    }

    struct Failing;

    impl Resolve for Failing {
        fn resolve(&self, host: &str, _service: &str) -> std::result::Result<Vec<SocketAddr>, String> {
            Err(format!("{host}: Name or service not known"))
        }
    }

    #[test]
    fn second_resolution_hits_the_cache() {
        let resolver = Counting {
            calls: AtomicUsize::new(0),
        };
        let mut endpoint = Endpoint::new("mail.example", "imaps");

        let first = resolve_endpoint(&mut endpoint, &resolver)
            .expect("resolves")
            .to_vec();
        let second = resolve_endpoint(&mut endpoint, &resolver)
            .expect("resolves")
            .to_vec();

        assert_eq!(first, second);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn forgetting_addresses_resolves_again() {
        let resolver = Counting {
            calls: AtomicUsize::new(0),
        };
        let mut endpoint = Endpoint::new("mail.example", "imaps");
        resolve_endpoint(&mut endpoint, &resolver).expect("resolves");
        endpoint.forget_addrs();
        resolve_endpoint(&mut endpoint, &resolver).expect("resolves");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn resolver_diagnostic_becomes_the_cause() {
        let mut endpoint = Endpoint::new("nowhere.invalid", "pop3");
        let err = resolve_endpoint(&mut endpoint, &Failing).expect_err("must fail");
        assert!(err.is_resolve());
        assert_eq!(err.to_string(), "nowhere.invalid: Name or service not known");
        assert!(endpoint.addrs().is_none());
    }
}
