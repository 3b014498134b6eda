//! Network module.
//!
//! Contains the Gateway (listener and event loop) and the transport
//! boundary between the synchronous core and the sockets.

mod gateway;
mod transport;

pub use gateway::Gateway;
pub use transport::{ConnectionEvent, TcpTransport, Transport};

#[cfg(test)]
pub use transport::testing;
