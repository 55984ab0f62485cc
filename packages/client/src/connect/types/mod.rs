mod connector;
mod transport;

pub use connector::Connector;
pub use transport::Transport;
