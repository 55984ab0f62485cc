//! Loopback servers and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use proxyconn_client::{ConnectConfig, Connector, Resolve, TlsConfig};
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, Issuer, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

/// Answers every lookup with the same addresses and counts the calls.
pub struct StaticResolver {
    addrs: Vec<SocketAddr>,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn new(addrs: Vec<SocketAddr>) -> Arc<Self> {
        Arc::new(Self {
            addrs,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self, _host: &str, _service: &str) -> Result<Vec<SocketAddr>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.addrs.clone())
    }
}

/// Config that trusts nothing but `roots`.
pub fn config_with_roots(roots: Vec<String>) -> ConnectConfig {
    ConnectConfig {
        tls: TlsConfig {
            use_system_certs: false,
            use_webpki_roots: false,
            custom_root_certs: roots,
        },
        ..ConnectConfig::default()
    }
}

pub fn connector(config: ConnectConfig, resolver: Arc<StaticResolver>) -> Connector {
    Connector::new(config)
        .expect("connector")
        .with_resolver(resolver)
}

/// Accept one connection on a fresh loopback listener and hand it to `serve`.
pub fn serve_once<F>(serve: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            serve(stream);
        }
    });
    (addr, handle)
}

/// An address nothing listens on.
pub fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}

/// Read until `needle` has been seen; returns everything read.
pub fn read_until<R: Read>(stream: &mut R, needle: &[u8]) -> Vec<u8> {
    let mut seen = Vec::new();
    let mut byte = [0u8; 1];
    while !seen.ends_with(needle) {
        match stream.read(&mut byte) {
            Ok(1) => seen.push(byte[0]),
            _ => break,
        }
    }
    seen
}

pub fn read_n<R: Read>(stream: &mut R, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    stream.read_exact(&mut buf).expect("read from client");
    buf
}

/// A private CA and a `localhost` server certificate it signed.
pub struct TestPki {
    pub ca_pem: String,
    pub server_config: Arc<rustls::ServerConfig>,
}

impl TestPki {
    pub fn new() -> Self {
        let ca_key = KeyPair::generate().expect("ca key");
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params
            .distinguished_name
            .push(DnType::CommonName, "proxyconn test ca");
        let ca_cert = ca_params.self_signed(&ca_key).expect("ca cert");
        let issuer = Issuer::new(ca_params, ca_key);

        let leaf_key = KeyPair::generate().expect("leaf key");
        let mut leaf_params =
            CertificateParams::new(vec!["localhost".to_string()]).expect("leaf params");
        leaf_params
            .distinguished_name
            .push(DnType::CommonName, "localhost");
        let leaf = leaf_params.signed_by(&leaf_key, &issuer).expect("leaf cert");

        let chain = vec![
            CertificateDer::from(leaf.der().to_vec()),
            CertificateDer::from(ca_cert.der().to_vec()),
        ];
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der()));
        let server_config = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .expect("server config");

        Self {
            ca_pem: ca_cert.pem(),
            server_config: Arc::new(server_config),
        }
    }
}

/// Run a TLS server session over `stream`: send `greeting`, then echo one
/// line back. Errors end the session quietly; the client side asserts.
pub fn tls_greet<S: Read + Write>(config: Arc<rustls::ServerConfig>, stream: S, greeting: &[u8]) {
    let Ok(conn) = rustls::ServerConnection::new(config) else {
        return;
    };
    let mut tls = rustls::StreamOwned::new(conn, stream);
    if tls.write_all(greeting).and_then(|()| tls.flush()).is_err() {
        return;
    }
    let line = read_until(&mut tls, b"\r\n");
    let _ = tls.write_all(&line);
    let _ = tls.flush();
}
