//! SOCKS5 wire format (RFC 1928, RFC 1929)
//!
//! Requests are encoded into fixed-capacity buffers after their variable
//! fields have been length-checked; replies are decoded from fixed-size
//! headers into typed values.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error;

pub const VERSION: u8 = 5;
/// Sub-negotiation version byte for username/password authentication, as
/// sent and checked on the wire by this client.
pub const AUTH_VERSION: u8 = 5;

pub const METHOD_NO_AUTH: u8 = 0;
pub const METHOD_USER_PASS: u8 = 2;

pub const CMD_CONNECT: u8 = 1;
pub const RESERVED: u8 = 0;

pub const ATYP_IPV4: u8 = 1;
pub const ATYP_DOMAIN: u8 = 3;
pub const ATYP_IPV6: u8 = 4;

/// Longest username, password or hostname a length byte can describe.
pub const MAX_FIELD_LEN: usize = 255;

/// Greeting: version, method count, methods.
pub type GreetingBuf = ArrayVec<u8, 4>;
/// version + (len + 255) * 2
pub type AuthBuf = ArrayVec<u8, { 1 + 2 * (1 + MAX_FIELD_LEN) }>;
/// version, command, reserved, type, len + 255, port
pub type ConnectBuf = ArrayVec<u8, { 4 + 1 + MAX_FIELD_LEN + 2 }>;

/// Everything that can go wrong speaking SOCKS5.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SocksError {
    #[error("bad port: {0}")]
    BadPort(String),
    #[error("user too long")]
    UserTooLong,
    #[error("pass too long")]
    PassTooLong,
    #[error("host too long")]
    HostTooLong,
    #[error("bad protocol version: {0}")]
    BadVersion(u8),
    #[error("unexpected method: {0}")]
    UnexpectedMethod(u8),
    #[error("authentication failed")]
    AuthFailed,
    #[error("{0}")]
    Rejected(ReplyCode),
    #[error("unknown address type: {0}")]
    UnknownAddressType(u8),
}

impl From<SocksError> for error::Error {
    fn from(e: SocksError) -> Self {
        match e {
            SocksError::BadPort(_)
            | SocksError::UserTooLong
            | SocksError::PassTooLong
            | SocksError::HostTooLong => error::config(e.to_string()).with(e),
            _ => error::protocol(e.to_string()).with(e),
        }
    }
}

/// Authentication method chosen by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    NoAuth,
    UserPass,
}

/// Method selection message offering "no authentication", plus
/// "username/password" when credentials are configured.
pub fn encode_greeting(with_auth: bool) -> GreetingBuf {
    let mut buf = GreetingBuf::new();
    if with_auth {
        buf.extend([VERSION, 2, METHOD_NO_AUTH, METHOD_USER_PASS]);
    } else {
        buf.extend([VERSION, 1, METHOD_NO_AUTH]);
    }
    buf
}

/// Decode the two-byte method selection reply.
pub fn decode_method_reply(reply: [u8; 2], with_auth: bool) -> Result<Method, SocksError> {
    let [version, method] = reply;
    if version != VERSION {
        return Err(SocksError::BadVersion(version));
    }
    match method {
        METHOD_NO_AUTH => Ok(Method::NoAuth),
        METHOD_USER_PASS if with_auth => Ok(Method::UserPass),
        other => Err(SocksError::UnexpectedMethod(other)),
    }
}

/// Username/password sub-negotiation request.
pub fn encode_auth(username: &str, password: &str) -> Result<AuthBuf, SocksError> {
    let mut buf = AuthBuf::new();
    buf.push(AUTH_VERSION);
    put_field(&mut buf, username.as_bytes(), SocksError::UserTooLong)?;
    put_field(&mut buf, password.as_bytes(), SocksError::PassTooLong)?;
    Ok(buf)
}

/// Decode the two-byte authentication status reply.
pub fn decode_auth_reply(reply: [u8; 2]) -> Result<(), SocksError> {
    let [version, status] = reply;
    if version != AUTH_VERSION {
        return Err(SocksError::BadVersion(version));
    }
    if status != 0 {
        return Err(SocksError::AuthFailed);
    }
    Ok(())
}

/// CONNECT request naming the target by domain name.
pub fn encode_connect(host: &str, port: u16) -> Result<ConnectBuf, SocksError> {
    let mut buf = ConnectBuf::new();
    buf.extend([VERSION, CMD_CONNECT, RESERVED, ATYP_DOMAIN]);
    put_field(&mut buf, host.as_bytes(), SocksError::HostTooLong)?;
    buf.try_extend_from_slice(&port.to_be_bytes())
        .map_err(|_| SocksError::HostTooLong)?;
    Ok(buf)
}

fn put_field<const N: usize>(
    buf: &mut ArrayVec<u8, N>,
    field: &[u8],
    too_long: SocksError,
) -> Result<(), SocksError> {
    let len = u8::try_from(field.len()).map_err(|_| too_long.clone())?;
    buf.try_push(len).map_err(|_| too_long.clone())?;
    buf.try_extend_from_slice(field).map_err(|_| too_long)
}

/// REP field of the CONNECT reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCode {
    Succeeded,
    ServerFailure,
    NotAllowed,
    NetworkUnreachable,
    HostUnreachable,
    ConnectionRefused,
    TtlExpired,
    CommandNotSupported,
    AddressTypeNotSupported,
    Unknown(u8),
}

impl ReplyCode {
    pub fn code(self) -> u8 {
        match self {
            ReplyCode::Succeeded => 0,
            ReplyCode::ServerFailure => 1,
            ReplyCode::NotAllowed => 2,
            ReplyCode::NetworkUnreachable => 3,
            ReplyCode::HostUnreachable => 4,
            ReplyCode::ConnectionRefused => 5,
            ReplyCode::TtlExpired => 6,
            ReplyCode::CommandNotSupported => 7,
            ReplyCode::AddressTypeNotSupported => 8,
            ReplyCode::Unknown(code) => code,
        }
    }

    fn description(self) -> &'static str {
        match self {
            ReplyCode::Succeeded => "succeeded",
            ReplyCode::ServerFailure => "server failure",
            ReplyCode::NotAllowed => "connection not permitted",
            ReplyCode::NetworkUnreachable => "network unreachable",
            ReplyCode::HostUnreachable => "host unreachable",
            ReplyCode::ConnectionRefused => "connection refused",
            ReplyCode::TtlExpired => "TTL expired",
            ReplyCode::CommandNotSupported => "command not supported",
            ReplyCode::AddressTypeNotSupported => "address type not supported",
            ReplyCode::Unknown(_) => "unknown failure",
        }
    }
}

impl From<u8> for ReplyCode {
    fn from(code: u8) -> Self {
        match code {
            0 => ReplyCode::Succeeded,
            1 => ReplyCode::ServerFailure,
            2 => ReplyCode::NotAllowed,
            3 => ReplyCode::NetworkUnreachable,
            4 => ReplyCode::HostUnreachable,
            5 => ReplyCode::ConnectionRefused,
            6 => ReplyCode::TtlExpired,
            7 => ReplyCode::CommandNotSupported,
            8 => ReplyCode::AddressTypeNotSupported,
            other => ReplyCode::Unknown(other),
        }
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// Bound address type announced by a successful CONNECT reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundAddr {
    Ipv4,
    /// Carries the domain length byte.
    Domain(u8),
    Ipv6,
}

impl BoundAddr {
    /// Reply bytes still unread after the five-byte reply head.
    ///
    /// The head ends with the first byte of BND.ADDR, so an IPv4 address
    /// leaves 3 address bytes plus 2 port bytes, an IPv6 address 15 plus 2,
    /// and a domain (whose first byte is its length) `len` plus 2.
    pub fn remaining(self) -> usize {
        match self {
            BoundAddr::Ipv4 => 4 - 1 + 2,
            BoundAddr::Ipv6 => 16 - 1 + 2,
            BoundAddr::Domain(len) => usize::from(len) + 2,
        }
    }
}

/// Decode VER, REP, RSV, ATYP and the first BND.ADDR byte.
pub fn decode_connect_reply(head: [u8; 5]) -> Result<BoundAddr, SocksError> {
    let [version, rep, _reserved, atyp, first] = head;
    if version != VERSION {
        return Err(SocksError::BadVersion(version));
    }
    match ReplyCode::from(rep) {
        ReplyCode::Succeeded => {}
        code => return Err(SocksError::Rejected(code)),
    }
    match atyp {
        ATYP_IPV4 => Ok(BoundAddr::Ipv4),
        ATYP_DOMAIN => Ok(BoundAddr::Domain(first)),
        ATYP_IPV6 => Ok(BoundAddr::Ipv6),
        other => Err(SocksError::UnknownAddressType(other)),
    }
}
