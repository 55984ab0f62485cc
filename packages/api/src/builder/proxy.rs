//! Proxy selection

use proxyconn_client::{Credentials, Proxy, error};

use crate::builder::core::DialBuilder;

impl DialBuilder {
    /// Tunnel through the proxy described by `url`
    /// (`http://`, `https://` or `socks5://[user:pass@]host[:port]`).
    ///
    /// A URL that does not parse is reported by `connect`.
    #[must_use]
    pub fn proxy(self, url: &str) -> Self {
        match url.parse::<Proxy>() {
            Ok(proxy) => self.via(proxy),
            Err(e) => self.defer(e.into()),
        }
    }

    #[must_use]
    pub fn via(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    #[must_use]
    pub fn http_proxy(self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.via(Proxy::http(host, port))
    }

    #[must_use]
    pub fn socks5(self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.via(Proxy::socks5(host, port, None))
    }

    /// SOCKS5 proxy with username/password authentication. Both halves must
    /// be non-empty.
    #[must_use]
    pub fn socks5_auth(
        self,
        host: impl Into<String>,
        port: impl Into<String>,
        username: &str,
        password: &str,
    ) -> Self {
        match Credentials::new(username, password) {
            Some(credentials) => self.via(Proxy::socks5(host, port, Some(credentials))),
            None => self.defer(error::config("invalid user or password")),
        }
    }

    /// Connect directly, dropping any proxy set earlier.
    #[must_use]
    pub fn direct(mut self) -> Self {
        self.proxy = None;
        self
    }
}
