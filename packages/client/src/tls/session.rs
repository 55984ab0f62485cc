//! Client session setup and the synchronous handshake

use std::io::{self, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::ServerCertVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};

use super::errors::{TlsError, Want};
use super::peer::check_peer;
use super::roots::build_root_store;
use super::verifier::DeferredVerification;
use crate::config::TlsConfig;
use crate::io::{PrefixedStream, Stream};

/// Socket mode switch for the duration of a handshake.
///
/// Entering clears the read/write timeouts and forces blocking mode, so the
/// handshake (and with it the peer certificate) completes before control
/// returns. This means the transport timeout does not apply while the
/// handshake runs: a peer that stalls mid-handshake holds the caller until the
/// operating system gives up on the connection. The previous timeouts are put
/// back by [`BlockingMode::restore`], or on drop if the handshake failed.
#[derive(Debug)]
pub struct BlockingMode {
    socket: TcpStream,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    restored: bool,
}

impl BlockingMode {
    pub fn enter(tcp: &TcpStream) -> io::Result<Self> {
        let socket = tcp.try_clone()?;
        let read_timeout = socket.read_timeout()?;
        let write_timeout = socket.write_timeout()?;
        socket.set_nonblocking(false)?;
        socket.set_read_timeout(None)?;
        socket.set_write_timeout(None)?;
        Ok(Self {
            socket,
            read_timeout,
            write_timeout,
            restored: false,
        })
    }

    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        self.apply()
    }

    fn apply(&self) -> io::Result<()> {
        self.socket.set_read_timeout(self.read_timeout)?;
        self.socket.set_write_timeout(self.write_timeout)
    }
}

impl Drop for BlockingMode {
    fn drop(&mut self) {
        if !self.restored && let Err(e) = self.apply() {
            tracing::debug!(target: "proxyconn::tls", "failed to restore socket timeouts: {}", e);
        }
    }
}

/// Client-side TLS session factory.
///
/// Holds the shared rustls configuration (verification deferred) and the
/// chain verifier used when an endpoint asks for its peer to be checked.
#[derive(Clone)]
pub struct TlsConnector {
    config: Arc<ClientConfig>,
    verifier: Option<Arc<WebPkiServerVerifier>>,
}

impl std::fmt::Debug for TlsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConnector")
            .field("verifier", &self.verifier.is_some())
            .finish()
    }
}

impl TlsConnector {
    pub fn new(tls: &TlsConfig) -> Result<Self, TlsError> {
        let provider: Arc<CryptoProvider> = Arc::new(rustls::crypto::ring::default_provider());

        let config = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .map_err(|e| TlsError::Setup {
                op: "tls context",
                detail: e.to_string(),
            })?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DeferredVerification::new(
                provider.clone(),
            )))
            .with_no_client_auth();

        let roots = build_root_store(tls)?;
        let verifier = if roots.is_empty() {
            tracing::warn!(target: "proxyconn::tls", "no trust anchors, peer verification will fail");
            None
        } else {
            let verifier = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider)
                .build()
                .map_err(|e| TlsError::RootStore(e.to_string()))?;
            Some(verifier)
        };

        Ok(Self {
            config: Arc::new(config),
            verifier,
        })
    }

    /// Run a client handshake over `stream` and check the peer.
    ///
    /// `prefix` holds bytes already read from `stream` that belong to the
    /// TLS session. On failure the partially built session is dropped; the
    /// underlying socket goes with it.
    pub fn establish(
        &self,
        stream: Stream,
        prefix: Bytes,
        host: &str,
        verify: bool,
    ) -> Result<Stream, TlsError> {
        let server_name = ServerName::try_from(host.to_string()).map_err(|e| TlsError::Setup {
            op: "server name",
            detail: e.to_string(),
        })?;
        let conn =
            ClientConnection::new(self.config.clone(), server_name.clone()).map_err(|e| {
                TlsError::Setup {
                    op: "tls session",
                    detail: e.to_string(),
                }
            })?;
        let mut tls = StreamOwned::new(conn, PrefixedStream::new(prefix, stream));

        let blocking = BlockingMode::enter(tls.sock.get_ref().tcp()).map_err(|e| {
            TlsError::Setup {
                op: "blocking mode",
                detail: e.to_string(),
            }
        })?;
        handshake(&mut tls)?;
        blocking.restore().map_err(|e| TlsError::Setup {
            op: "blocking mode",
            detail: e.to_string(),
        })?;

        tracing::debug!(
            target: "proxyconn::tls",
            host,
            version = ?tls.conn.protocol_version(),
            suite = ?tls.conn.negotiated_cipher_suite().map(|s| s.suite()),
            "tls handshake complete"
        );

        check_peer(
            tls.conn.peer_certificates(),
            verify,
            self.verifier.as_deref().map(|v| v as &dyn ServerCertVerifier),
            &server_name,
        )?;

        Ok(Stream::Tls(Box::new(tls)))
    }
}

fn handshake(tls: &mut StreamOwned<ClientConnection, PrefixedStream<Stream>>) -> Result<(), TlsError> {
    const OP: &str = "tls handshake";

    while tls.conn.is_handshaking() {
        if let Err(e) = tls.conn.complete_io(&mut tls.sock) {
            return Err(handshake_error(OP, &tls.conn, e));
        }
    }
    Ok(())
}

fn handshake_error(op: &'static str, conn: &ClientConnection, err: io::Error) -> TlsError {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => TlsError::Stalled {
            op,
            want: if conn.wants_write() { Want::Write } else { Want::Read },
        },
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset => TlsError::Handshake {
            op,
            detail: "connection reset by peer".to_string(),
        },
        _ => {
            let detail = match err.get_ref().and_then(|e| e.downcast_ref::<rustls::Error>()) {
                Some(tls_err) => tls_err.to_string(),
                None => err.to_string(),
            };
            TlsError::Handshake { op, detail }
        }
    }
}
