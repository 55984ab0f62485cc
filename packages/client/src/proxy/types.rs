//! Proxy descriptor types

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::endpoint::Endpoint;

/// Username/password pair for SOCKS5 authentication.
///
/// Both halves are non-empty; construction through [`Credentials::new`]
/// is the only way to obtain one.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Returns `None` if either half is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Protocol spoken to the proxy server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    Http,
    Https,
    Socks5,
}

impl ProxyKind {
    pub fn scheme(self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Https => "https",
            ProxyKind::Socks5 => "socks5",
        }
    }

    /// Service name used when the URL carries no port.
    pub fn default_port(self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Https => "https",
            ProxyKind::Socks5 => "socks",
        }
    }
}

/// Proxy server configuration.
///
/// HTTP and HTTPS proxies tunnel with `CONNECT` and carry no credentials;
/// only SOCKS5 supports username/password authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proxy {
    /// HTTP CONNECT over plain TCP
    Http { server: Endpoint },
    /// HTTP CONNECT over TLS to the proxy
    Https { server: Endpoint },
    Socks5 {
        server: Endpoint,
        credentials: Option<Credentials>,
    },
}

impl Proxy {
    pub fn http(host: impl Into<String>, port: impl Into<String>) -> Self {
        Proxy::Http {
            server: Endpoint::new(host, port),
        }
    }

    pub fn https(host: impl Into<String>, port: impl Into<String>) -> Self {
        Proxy::Https {
            server: Endpoint::new(host, port).with_tls(true),
        }
    }

    pub fn socks5(
        host: impl Into<String>,
        port: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Self {
        Proxy::Socks5 {
            server: Endpoint::new(host, port),
            credentials,
        }
    }

    pub fn kind(&self) -> ProxyKind {
        match self {
            Proxy::Http { .. } => ProxyKind::Http,
            Proxy::Https { .. } => ProxyKind::Https,
            Proxy::Socks5 { .. } => ProxyKind::Socks5,
        }
    }

    /// The proxy server itself.
    pub fn server(&self) -> &Endpoint {
        match self {
            Proxy::Http { server } | Proxy::Https { server } | Proxy::Socks5 { server, .. } => {
                server
            }
        }
    }

    pub fn server_mut(&mut self) -> &mut Endpoint {
        match self {
            Proxy::Http { server } | Proxy::Https { server } | Proxy::Socks5 { server, .. } => {
                server
            }
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Proxy::Socks5 { credentials, .. } => credentials.as_ref(),
            Proxy::Http { .. } | Proxy::Https { .. } => None,
        }
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.kind().scheme())?;
        if let Some(credentials) = self.credentials() {
            write!(f, "{}:***@", credentials.username())?;
        }
        let server = self.server();
        write!(f, "{}:{}", server.host, server.port)
    }
}

impl std::str::FromStr for Proxy {
    type Err = super::ProxyUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse_proxy_url(s)
    }
}

impl<'de> Deserialize<'de> for Proxy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let url = String::deserialize(deserializer)?;
        super::parse_proxy_url(&url).map_err(serde::de::Error::custom)
    }
}
