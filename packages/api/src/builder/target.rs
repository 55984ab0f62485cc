//! Target and transport settings

use std::time::Duration;

use proxyconn_client::Eol;

use crate::builder::core::DialBuilder;

impl DialBuilder {
    /// Speak TLS to the target and verify its certificate chain.
    #[must_use]
    pub fn tls(mut self) -> Self {
        self.target.tls = true;
        self.target.verify = true;
        self
    }

    /// Speak TLS to the target without checking who answered.
    #[must_use]
    pub fn tls_unverified(mut self) -> Self {
        self.target.tls = true;
        self.target.verify = false;
        self
    }

    /// Line terminator of the protocol spoken over the transport
    #[must_use]
    pub fn line_ending(mut self, eol: Eol) -> Self {
        self.config.eol = eol;
        self
    }

    /// Bound on each wait for data once connected.
    ///
    /// Also bounds each TCP connect unless [`DialBuilder::connect_timeout`]
    /// is set. It does not bound the TLS handshake.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Trust an extra PEM-encoded root certificate.
    #[must_use]
    pub fn root_certificate(mut self, pem: impl Into<String>) -> Self {
        self.config.tls.custom_root_certs.push(pem.into());
        self
    }

    /// Trust only the roots added with [`DialBuilder::root_certificate`]
    /// (and the bundled webpki roots, if enabled).
    #[must_use]
    pub fn without_system_roots(mut self) -> Self {
        self.config.tls.use_system_certs = false;
        self
    }

    #[must_use]
    pub fn webpki_roots(mut self, enabled: bool) -> Self {
        self.config.tls.use_webpki_roots = enabled;
        self
    }
}
