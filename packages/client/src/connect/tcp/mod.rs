//! TCP connection and proxy negotiation
//!
//! Address-list connection with fallback, socket configuration, and the two
//! tunnel protocols: HTTP CONNECT and SOCKS5.

pub mod basic_connection;
pub mod http_connect;
pub mod socket_config;
pub mod socks_protocol;
pub mod socks_wire;

pub use basic_connection::connect_to_address_list;
pub use http_connect::establish_connect_tunnel;
pub use socket_config::configure_tcp_socket;
pub use socks_protocol::socks5_handshake;
pub use socks_wire::{ReplyCode, SocksError};
