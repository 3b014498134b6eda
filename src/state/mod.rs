//! Server state.
//!
//! - [`Registry`]: the single owner of sessions and channels
//! - [`Session`]: one connection and its handshake progress
//! - [`Channel`]: membership, privileges and modes

mod channel;
mod registry;
mod session;

pub use channel::Channel;
pub use registry::Registry;
pub use session::{RegistrationFlags, RegistrationState, Session, SessionId};

/// Identity and secret shared by every reply and registration check.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Source of every numeric reply.
    pub name: String,
    /// Password every client must present.
    pub password: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}
