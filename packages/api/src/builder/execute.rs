//! Running the attempt

use proxyconn_client::{Connector, Result};

use crate::builder::core::DialBuilder;
use crate::connection::Connection;

impl DialBuilder {
    /// Open the connection.
    pub fn connect(self) -> Result<Connection> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }

        let connector = match self.connector {
            Some(connector) => connector,
            None => Connector::new(self.config.clone())?,
        };

        if self.debug_enabled {
            tracing::debug!(
                target: "proxyconn::dial",
                target_endpoint = %self.target,
                proxy = ?self.proxy.as_ref().map(ToString::to_string),
                tls = self.target.tls,
                verify = self.target.verify,
                "dialing"
            );
        }

        Connection::open(
            connector,
            self.target,
            self.proxy,
            self.config.eol,
            self.config.timeout,
        )
    }
}
