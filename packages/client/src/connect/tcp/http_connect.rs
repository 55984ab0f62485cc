//! HTTP CONNECT tunnel establishment

use crate::endpoint::Endpoint;
use crate::error::{self, Result};
use crate::io::{BufferedIo, TimedStream};

/// Ask the HTTP proxy behind `io` to open a tunnel to `target`.
///
/// Only a `200` status is accepted. Response headers are read and discarded
/// up to the blank line that ends them.
pub fn establish_connect_tunnel<S: TimedStream>(
    io: &mut BufferedIo<S>,
    target: &Endpoint,
) -> Result<()> {
    let port = target
        .port_number()
        .ok_or_else(|| error::config(format!("bad port: {}", target.port)))?;

    io.write_line(&format!("CONNECT {}:{port} HTTP/1.1", authority_host(&target.host)))?;
    io.write_line("")?;

    let status = io.read_line_bytes()?;
    check_status_line(&status)?;
    tracing::trace!(
        target: "proxyconn::http_connect",
        status = %String::from_utf8_lossy(&status),
        "proxy accepted"
    );

    while !io.read_line_bytes()?.is_empty() {}

    tracing::debug!(target: "proxyconn::http_connect", endpoint = %target, "tunnel established");
    Ok(())
}

fn authority_host(host: &str) -> std::borrow::Cow<'_, str> {
    if host.contains(':') {
        format!("[{host}]").into()
    } else {
        host.into()
    }
}

/// `HTTP/x.y 200 ...`: the status code sits at byte offset 9.
fn check_status_line(line: &[u8]) -> Result<()> {
    let ok = line.len() >= 12 && line.starts_with(b"HTTP/") && &line[8..12] == b" 200";
    if ok {
        Ok(())
    } else {
        Err(error::protocol(format!(
            "unexpected data: {}",
            String::from_utf8_lossy(line)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::scripted::scripted;

    #[test]
    fn accepts_200_and_skips_headers() {
        let mut io = scripted(
            b"HTTP/1.1 200 Connection Established\r\nProxy-Agent: x\r\n\r\n* OK ready\r\n",
        );
        establish_connect_tunnel(&mut io, &Endpoint::new("imap.example", "imaps"))
            .expect("tunnel");
        assert_eq!(io.get_ref().output, b"CONNECT imap.example:993 HTTP/1.1\r\n\r\n");
        assert_eq!(io.read_line().expect("banner"), "* OK ready");
    }

    #[test]
    fn non_200_status_is_embedded_in_the_cause() {
        let mut io = scripted(b"HTTP/1.1 407 Proxy Authentication Required\r\n\r\n");
        let err = establish_connect_tunnel(&mut io, &Endpoint::new("h", "25"))
            .expect_err("407");
        assert!(err.is_protocol());
        assert_eq!(
            err.to_string(),
            "unexpected data: HTTP/1.1 407 Proxy Authentication Required"
        );
    }

    #[test]
    fn eight_bit_headers_are_skipped() {
        let mut io = scripted(b"HTTP/1.1 200 OK\r\nVia: caf\xe9\r\n\r\n+OK\r\n");
        establish_connect_tunnel(&mut io, &Endpoint::new("pop.example", "pop3"))
            .expect("tunnel");
        assert_eq!(io.read_line().expect("banner"), "+OK");
    }

    #[test]
    fn status_line_shape() {
        assert!(check_status_line(b"HTTP/1.0 200 OK").is_ok());
        assert!(check_status_line(b"HTTP/1.1 200 ").is_ok());
        assert!(check_status_line(b"HTTP/1.1 200").is_ok());
        assert!(check_status_line(b"HTTP/1.1 20").is_err());
        assert!(check_status_line(b"HTTP/1.1 301 Moved").is_err());
        assert!(check_status_line(b"SMTP/1.1 200 OK").is_err());
        assert!(check_status_line(b"").is_err());
    }

    #[test]
    fn ipv6_targets_are_bracketed() {
        let mut io = scripted(b"HTTP/1.1 200 OK\r\n\r\n");
        establish_connect_tunnel(&mut io, &Endpoint::new("::1", "smtp")).expect("tunnel");
        assert_eq!(io.get_ref().output, b"CONNECT [::1]:25 HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn bad_port_fails_before_io() {
        let mut io = scripted(b"");
        let err = establish_connect_tunnel(&mut io, &Endpoint::new("h", "0")).expect_err("port");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "bad port: 0");
        assert!(io.get_ref().output.is_empty());
    }
}
