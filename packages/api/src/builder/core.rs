//! Core `DialBuilder` structure and base functionality

use std::fmt;

use proxyconn_client::{ConnectConfig, Connector, Endpoint, Error, Proxy};

/// Builder for one outbound connection.
///
/// Configuration mistakes (a malformed proxy URL, say) do not interrupt the
/// chain; the first one is kept and returned by
/// [`DialBuilder::connect`](crate::DialBuilder::connect).
pub struct DialBuilder {
    /// Server the transport should end up talking to
    pub(crate) target: Endpoint,
    /// Proxy to tunnel through, if any
    pub(crate) proxy: Option<Proxy>,
    /// Settings used when no shared connector is supplied
    pub(crate) config: ConnectConfig,
    /// Shared connector; built from `config` on demand otherwise
    pub(crate) connector: Option<Connector>,
    /// Debug logging enabled flag
    pub(crate) debug_enabled: bool,
    /// First configuration error seen while chaining
    pub(crate) deferred_error: Option<Error>,
}

impl DialBuilder {
    /// Start building a connection to `host` on `port` (a number or a
    /// service name such as `"imaps"`).
    #[must_use]
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            target: Endpoint::new(host, port),
            proxy: None,
            config: ConnectConfig::default(),
            connector: None,
            debug_enabled: false,
            deferred_error: None,
        }
    }

    /// Start from a fully described endpoint.
    #[must_use]
    pub fn endpoint(target: Endpoint) -> Self {
        Self {
            target,
            ..Self::new(String::new(), String::new())
        }
    }

    /// Use a shared connector instead of building one from this builder's
    /// settings. Its trust anchors and resolver win; line ending and timeout
    /// set on the builder still apply.
    #[must_use]
    pub fn with_connector(mut self, connector: &Connector) -> Self {
        self.connector = Some(connector.clone());
        self
    }

    /// Replace all transport settings at once.
    #[must_use]
    pub fn config(mut self, config: ConnectConfig) -> Self {
        self.config = config;
        self
    }

    /// Log the attempt's target, proxy and TLS settings at debug level
    /// before connecting.
    ///
    /// Logging inside the connector is governed by the subscriber alone.
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    pub(crate) fn defer(mut self, err: Error) -> Self {
        if self.deferred_error.is_none() {
            self.deferred_error = Some(err);
        }
        self
    }

    pub fn target(&self) -> &Endpoint {
        &self.target
    }

    pub fn proxy_ref(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }
}

impl fmt::Debug for DialBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialBuilder")
            .field("target", &self.target)
            .field("proxy", &self.proxy.as_ref().map(ToString::to_string))
            .field("config", &self.config)
            .field("shared_connector", &self.connector.is_some())
            .field("debug_enabled", &self.debug_enabled)
            .field("deferred_error", &self.deferred_error)
            .finish_non_exhaustive()
    }
}
