use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `proxyconn_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed connection attempt.
///
/// The `Display` rendering is the human-readable cause string reported to the
/// caller, e.g. `"5: connection refused"` or `"connect: Connection refused"`.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub cause: String,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Stage of the attempt that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Malformed proxy URL, credentials on an unsupported proxy type,
    /// oversized credential or hostname fields, unusable port.
    Config,
    /// Host or service lookup failure
    Resolve,
    /// Connect refused, read or write failure, timeout
    Transport,
    /// Unexpected version byte, status, method or address type
    Protocol,
    /// Handshake failure, verification failure, missing certificate
    Tls,
}

impl Error {
    pub fn new(kind: Kind, cause: impl Into<String>) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                cause: cause.into(),
                source: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// The cause string, without any kind prefix.
    #[must_use]
    pub fn cause(&self) -> &str {
        &self.inner.cause
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("proxyconn::Error");

        f.field("kind", &self.inner.kind);
        f.field("cause", &self.inner.cause);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.cause)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
