//! An open connection and the endpoints it was made from

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use proxyconn_client::{Connector, Endpoint, Eol, Proxy, Result, Transport};

/// A [`Transport`] together with the endpoints used to reach it.
///
/// The endpoints keep their resolved addresses, so [`Connection::reconnect`]
/// goes straight to the socket calls. A failed reconnect drops the cached
/// addresses; the attempt after it resolves afresh.
#[derive(Debug)]
pub struct Connection {
    transport: Transport,
    connector: Connector,
    target: Endpoint,
    proxy: Option<Proxy>,
}

impl Connection {
    pub(crate) fn open(
        connector: Connector,
        mut target: Endpoint,
        mut proxy: Option<Proxy>,
        eol: Eol,
        timeout: Duration,
    ) -> Result<Self> {
        let transport = connector.connect(&mut target, proxy.as_mut(), eol, timeout)?;
        Ok(Self {
            transport,
            connector,
            target,
            proxy,
        })
    }

    /// Drop the current transport and connect again with the same settings.
    pub fn reconnect(&mut self) -> Result<()> {
        let eol = self.transport.eol();
        let timeout = self.transport.timeout();
        match self
            .connector
            .connect(&mut self.target, self.proxy.as_mut(), eol, timeout)
        {
            Ok(transport) => {
                self.transport = transport;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(target: "proxyconn::dial", error = %e, "reconnect failed, forgetting addresses");
                match self.proxy.as_mut() {
                    Some(proxy) => proxy.server_mut().forget_addrs(),
                    None => self.target.forget_addrs(),
                }
                Err(e)
            }
        }
    }

    pub fn target(&self) -> &Endpoint {
        &self.target
    }

    pub fn proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }

    pub fn into_transport(self) -> Transport {
        self.transport
    }

    pub fn close(self) -> Result<()> {
        self.transport.close()
    }
}

impl Deref for Connection {
    type Target = Transport;

    fn deref(&self) -> &Transport {
        &self.transport
    }
}

impl DerefMut for Connection {
    fn deref_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }
}
