//! Post-handshake peer certificate checks

use rustls::client::danger::ServerCertVerifier;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};

use super::errors::TlsError;

/// Subject and issuer of a peer certificate, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerCertificate {
    pub subject: String,
    pub issuer: String,
}

impl PeerCertificate {
    /// Returns `None` if the DER does not parse as X.509.
    pub fn from_der(der: &[u8]) -> Option<Self> {
        let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
        Some(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
        })
    }
}

/// Decide whether the presented chain is acceptable.
///
/// Without `verify`, any peer passes, certificate or not. With `verify`, a
/// missing certificate always fails and a present chain must satisfy
/// `verifier` for `server_name`.
pub fn check_peer(
    certs: Option<&[CertificateDer<'_>]>,
    verify: bool,
    verifier: Option<&dyn ServerCertVerifier>,
    server_name: &ServerName<'_>,
) -> Result<(), TlsError> {
    let Some((end_entity, intermediates)) = certs.and_then(|certs| certs.split_first()) else {
        if verify {
            return Err(TlsError::NoCertificate);
        }
        tracing::debug!(target: "proxyconn::tls", "peer presented no certificate");
        return Ok(());
    };

    match PeerCertificate::from_der(end_entity.as_ref()) {
        Some(cert) => {
            tracing::debug!(target: "proxyconn::tls", "cert subject: {}", cert.subject);
            tracing::debug!(target: "proxyconn::tls", "cert issuer: {}", cert.issuer);
        }
        None => tracing::debug!(target: "proxyconn::tls", "peer certificate is not parsable X.509"),
    }

    if !verify {
        return Ok(());
    }

    let verifier =
        verifier.ok_or_else(|| TlsError::Verification("no trust anchors configured".to_string()))?;
    verifier
        .verify_server_cert(end_entity, intermediates, server_name, &[], UnixTime::now())
        .map(|_| ())
        .map_err(|e| TlsError::Verification(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> ServerName<'static> {
        ServerName::try_from("mail.example").expect("valid name")
    }

    #[test]
    fn missing_certificate_fails_only_when_verifying() {
        let err = check_peer(None, true, None, &name()).expect_err("must fail");
        assert!(matches!(err, TlsError::NoCertificate));
        assert_eq!(
            err.to_string(),
            "certificate verification failed: no certificate"
        );

        check_peer(None, false, None, &name()).expect("unverified peer passes");
        check_peer(Some(&[][..]), false, None, &name()).expect("unverified peer passes");
        assert!(matches!(
            check_peer(Some(&[][..]), true, None, &name()),
            Err(TlsError::NoCertificate)
        ));
    }

    #[test]
    fn subject_and_issuer_are_extracted() {
        let mut params = rcgen::CertificateParams::new(vec!["mail.example".to_string()])
            .expect("params");
        params
            .distinguished_name
            .push(rcgen::DnType::CommonName, "mail.example");
        let key_pair = rcgen::KeyPair::generate().expect("key");
        let cert = params.self_signed(&key_pair).expect("cert");

        let peer = PeerCertificate::from_der(cert.der()).expect("parses");
        assert!(peer.subject.contains("CN=mail.example"));
        assert_eq!(peer.subject, peer.issuer);
    }
}
