//! Connection orchestration
//!
//! One attempt runs: resolve, connect (with fallback across addresses), TLS
//! to an HTTPS proxy, tunnel negotiation, TLS to the target, and finally the
//! caller's line terminator and timeout are installed on the result. Any
//! failure drops everything acquired so far.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ConnectConfig;
use crate::connect::tcp::{
    configure_tcp_socket, connect_to_address_list, establish_connect_tunnel, socks5_handshake,
};
use crate::dns::{GaiResolver, Resolve, resolve_endpoint};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::io::{BufferedIo, Eol, Stream};
use crate::proxy::Proxy;
use crate::tls::TlsConnector;

use super::transport::Transport;

/// Opens [`Transport`]s, directly or through a proxy.
///
/// Cheap to clone; the TLS configuration and resolver are shared.
#[derive(Clone)]
pub struct Connector {
    resolver: Arc<dyn Resolve>,
    tls: TlsConnector,
    config: ConnectConfig,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("tls", &self.tls)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Connector {
    /// Build a connector using the system resolver.
    ///
    /// Fails if the configured trust anchors cannot be loaded.
    pub fn new(config: ConnectConfig) -> Result<Self> {
        let tls = TlsConnector::new(&config.tls)?;
        Ok(Self {
            resolver: Arc::new(GaiResolver),
            tls,
            config,
        })
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// [`Connector::connect`] with the configured line terminator and timeout.
    pub fn dial(&self, target: &mut Endpoint, proxy: Option<&mut Proxy>) -> Result<Transport> {
        self.connect(target, proxy, self.config.eol, self.config.timeout)
    }

    /// Open a transport to `target`, through `proxy` when given.
    ///
    /// Resolved addresses are cached on the endpoints that get resolved:
    /// `target` for direct connections, the proxy server otherwise (the
    /// proxy resolves the target itself). The proxy exchange always uses
    /// CRLF; `eol` and `timeout` apply to the returned transport.
    pub fn connect(
        &self,
        target: &mut Endpoint,
        proxy: Option<&mut Proxy>,
        eol: Eol,
        timeout: Duration,
    ) -> Result<Transport> {
        let mut io = match proxy {
            None => self.open(target, eol, timeout)?,
            Some(proxy) => self.tunnel(proxy, target, timeout)?,
        };
        io.set_eol(eol);
        io.set_timeout(timeout);

        tracing::info!(
            target: "proxyconn::connect",
            endpoint = %target,
            tls = io.get_ref().is_tls(),
            "connected"
        );
        Ok(Transport::new(io))
    }

    fn tunnel(
        &self,
        proxy: &mut Proxy,
        target: &Endpoint,
        timeout: Duration,
    ) -> Result<BufferedIo<Stream>> {
        let mut io = self.open(proxy.server_mut(), Eol::Crlf, timeout)?;
        tracing::debug!(
            target: "proxyconn::connect",
            proxy = %proxy.server(),
            kind = proxy.kind().scheme(),
            endpoint = %target,
            "negotiating tunnel"
        );

        match &*proxy {
            Proxy::Http { .. } | Proxy::Https { .. } => establish_connect_tunnel(&mut io, target)?,
            Proxy::Socks5 { credentials, .. } => {
                socks5_handshake(&mut io, target, credentials.as_ref())?
            }
        }

        if target.tls {
            return self.start_tls(io, target);
        }
        Ok(io)
    }

    /// Resolve, connect and, if the endpoint asks for it, start TLS.
    fn open(&self, endpoint: &mut Endpoint, eol: Eol, timeout: Duration) -> Result<BufferedIo<Stream>> {
        let connect_timeout = self.config.connect_timeout_for(timeout);
        let addrs = resolve_endpoint(endpoint, self.resolver.as_ref())?;
        let tcp = connect_to_address_list(addrs, Some(connect_timeout))?;
        configure_tcp_socket(&tcp, timeout)?;

        let io = BufferedIo::new(Stream::Plain(tcp), eol, timeout);
        if endpoint.tls {
            return self.start_tls(io, endpoint);
        }
        Ok(io)
    }

    fn start_tls(&self, io: BufferedIo<Stream>, endpoint: &Endpoint) -> Result<BufferedIo<Stream>> {
        let (eol, timeout) = (io.eol(), io.timeout());
        let (stream, prefix) = io.into_parts();
        let stream = self
            .tls
            .establish(stream, prefix, &endpoint.host, endpoint.verify)?;
        Ok(BufferedIo::new(stream, eol, timeout))
    }
}
