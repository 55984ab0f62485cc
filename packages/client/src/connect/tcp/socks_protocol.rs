//! SOCKS5 negotiation over an open proxy connection

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::io::{BufferedIo, TimedStream};
use crate::proxy::Credentials;

use super::socks_wire::{self, Method, SocksError};

/// Ask the SOCKS5 proxy behind `io` to connect to `target`.
///
/// Every request is encoded, and so length-checked, before the first byte
/// goes out. On success the stream is positioned at the first byte from the
/// target.
pub fn socks5_handshake<S: TimedStream>(
    io: &mut BufferedIo<S>,
    target: &Endpoint,
    credentials: Option<&Credentials>,
) -> Result<()> {
    let port = target
        .port_number()
        .ok_or_else(|| SocksError::BadPort(target.port.clone()))?;
    let auth = credentials
        .map(|c| socks_wire::encode_auth(c.username(), c.password()))
        .transpose()?;
    let connect = socks_wire::encode_connect(&target.host, port)?;

    io.write(&socks_wire::encode_greeting(auth.is_some()))?;
    let method = socks_wire::decode_method_reply(io.read_array()?, auth.is_some())?;
    tracing::trace!(target: "proxyconn::socks", ?method, "method selected");

    if let (Method::UserPass, Some(auth)) = (method, &auth) {
        io.write(auth)?;
        socks_wire::decode_auth_reply(io.read_array()?)?;
    }

    io.write(&connect)?;
    let bound = socks_wire::decode_connect_reply(io.read_array()?)?;
    io.read_exact(bound.remaining())?;

    tracing::debug!(target: "proxyconn::socks", endpoint = %target, "tunnel established");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::scripted::scripted;

    fn target() -> Endpoint {
        Endpoint::new("mail.example", "imaps")
    }

    #[test]
    fn no_auth_ipv4_reply_consumes_exactly_the_reply() {
        let mut io = scripted(b"\x05\x00\x05\x00\x00\x01\x7f\x00\x00\x01\x00\x19* OK");
        socks5_handshake(&mut io, &target(), None).expect("handshake");
        assert_eq!(io.read_line().err().map(|e| e.to_string()), Some("connection closed".into()));

        let mut io = scripted(b"\x05\x00\x05\x00\x00\x01\x7f\x00\x00\x01\x00\x19* OK\r\n");
        socks5_handshake(&mut io, &target(), None).expect("handshake");
        assert_eq!(io.read_line().expect("greeting"), "* OK");

        let mut expected = vec![5, 1, 0, 5, 1, 0, 3, 12];
        expected.extend_from_slice(b"mail.example");
        expected.extend_from_slice(&993u16.to_be_bytes());
        assert_eq!(io.get_ref().output, expected);
    }

    #[test]
    fn domain_and_ipv6_replies_are_drained() {
        let mut io = scripted(b"\x05\x00\x05\x00\x00\x03\x03abc\x00\x19rest\r\n");
        socks5_handshake(&mut io, &target(), None).expect("handshake");
        assert_eq!(io.read_line().expect("line"), "rest");

        let mut reply = b"\x05\x00\x05\x00\x00\x04".to_vec();
        reply.extend_from_slice(&[0u8; 16]);
        reply.extend_from_slice(b"\x00\x19rest\r\n");
        let mut io = scripted(&reply);
        socks5_handshake(&mut io, &target(), None).expect("handshake");
        assert_eq!(io.read_line().expect("line"), "rest");
    }

    #[test]
    fn user_pass_authentication() {
        let creds = Credentials::new("u", "p").expect("creds");
        let mut io = scripted(b"\x05\x02\x05\x00\x05\x00\x00\x01\x00\x00\x00\x00\x00\x00");
        socks5_handshake(&mut io, &target(), Some(&creds)).expect("handshake");
        assert_eq!(&io.get_ref().output[..4], &[5, 2, 0, 2]);
        assert_eq!(&io.get_ref().output[4..9], &[5, 1, b'u', 1, b'p']);
    }

    #[test]
    fn rejected_authentication() {
        let creds = Credentials::new("u", "p").expect("creds");
        let mut io = scripted(b"\x05\x02\x05\x01");
        let err = socks5_handshake(&mut io, &target(), Some(&creds)).expect_err("refused");
        assert!(err.is_protocol());
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn user_pass_without_credentials_is_inconsistent() {
        let mut io = scripted(b"\x05\x02");
        let err = socks5_handshake(&mut io, &target(), None).expect_err("no creds");
        assert_eq!(err.to_string(), "unexpected method: 2");
    }

    #[test]
    fn connect_failure_names_the_code() {
        let mut io = scripted(b"\x05\x00\x05\x05\x00\x01\x00");
        let err = socks5_handshake(&mut io, &target(), None).expect_err("refused");
        assert!(err.is_protocol());
        assert_eq!(err.to_string(), "5: connection refused");
    }

    #[test]
    fn bad_version_in_method_reply() {
        let mut io = scripted(b"\x04\x00");
        let err = socks5_handshake(&mut io, &target(), None).expect_err("version");
        assert_eq!(err.to_string(), "bad protocol version: 4");
    }

    #[test]
    fn unknown_address_type() {
        let mut io = scripted(b"\x05\x00\x05\x00\x00\x07\x00");
        let err = socks5_handshake(&mut io, &target(), None).expect_err("atyp");
        assert_eq!(err.to_string(), "unknown address type: 7");
    }

    #[test]
    fn oversized_fields_fail_before_any_io() {
        let long = "x".repeat(256);
        let mut io = scripted(b"");
        let err = socks5_handshake(&mut io, &Endpoint::new(long.clone(), "25"), None)
            .expect_err("host");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "host too long");

        let creds = Credentials::new(long, "p").expect("creds");
        let err = socks5_handshake(&mut io, &target(), Some(&creds)).expect_err("user");
        assert_eq!(err.to_string(), "user too long");
        assert!(io.get_ref().output.is_empty());
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut io = scripted(b"");
        let err = socks5_handshake(&mut io, &Endpoint::new("h", "nope"), None).expect_err("port");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "bad port: nope");
    }
}
