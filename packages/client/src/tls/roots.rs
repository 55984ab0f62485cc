//! Trust anchors for peer verification

use rustls::RootCertStore;

use super::errors::TlsError;
use crate::config::TlsConfig;

/// Assemble the root store described by `config`.
///
/// System roots that fail to load are reported and replaced by the bundled
/// webpki roots. Custom PEM roots that cannot be parsed are an error.
pub fn build_root_store(config: &TlsConfig) -> Result<RootCertStore, TlsError> {
    let mut root_store = RootCertStore::empty();
    let mut want_webpki = config.use_webpki_roots;

    if config.use_system_certs {
        let loaded = rustls_native_certs::load_native_certs();
        let (added, ignored) = root_store.add_parsable_certificates(loaded.certs);
        if ignored > 0 {
            tracing::warn!(target: "proxyconn::tls", ignored, "skipped unparsable system certificates");
        }
        if !loaded.errors.is_empty() {
            for err in &loaded.errors {
                tracing::warn!(target: "proxyconn::tls", "certificate load error: {}", err);
            }
            want_webpki = true;
        }
        tracing::debug!(target: "proxyconn::tls", added, "loaded system certificates");
    }

    if want_webpki {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    for pem in &config.custom_root_certs {
        let mut reader = pem.as_bytes();
        let mut found = false;
        for cert in rustls_pemfile::certs(&mut reader) {
            let cert = cert.map_err(|e| TlsError::RootStore(e.to_string()))?;
            root_store
                .add(cert)
                .map_err(|e| TlsError::RootStore(e.to_string()))?;
            found = true;
        }
        if !found {
            return Err(TlsError::RootStore(
                "no certificate found in PEM data".to_string(),
            ));
        }
    }

    Ok(root_store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webpki_roots_only() {
        let config = TlsConfig {
            use_system_certs: false,
            use_webpki_roots: true,
            custom_root_certs: Vec::new(),
        };
        let store = build_root_store(&config).expect("roots");
        assert!(!store.is_empty());
    }

    #[test]
    fn garbage_pem_is_rejected() {
        let config = TlsConfig {
            use_system_certs: false,
            use_webpki_roots: false,
            custom_root_certs: vec!["not a certificate".to_string()],
        };
        let err = build_root_store(&config).expect_err("must fail");
        assert!(matches!(err, TlsError::RootStore(_)));
    }
}
