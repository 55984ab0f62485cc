//! TLS session establishment
//!
//! Sessions are created with peer verification switched off in the rustls
//! configuration; when an endpoint asks for verification, the certificate
//! chain is checked by hand once the handshake has finished. The handshake
//! itself runs with the socket in plain blocking mode (see [`BlockingMode`]).

pub mod errors;
mod peer;
mod roots;
mod session;
mod verifier;

pub use errors::{TlsError, Want};
pub use peer::{PeerCertificate, check_peer};
pub use roots::build_root_store;
pub use session::{BlockingMode, TlsConnector};
