//! ircrelay - a single-threaded IRC-style chat relay.
//!
//! Clients connect over TCP, register with PASS/NICK/USER, then join
//! channels and exchange messages. Every permission and moderation rule is
//! enforced by the relay.
//!
//! - [`hub`]: the synchronous core driven by the event loop
//! - [`handlers`]: registration and the post-registration commands
//! - [`state`]: sessions, channels and the registry that owns them
//! - [`network`]: listener, event loop and socket transports

pub mod config;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod network;
pub mod state;
pub mod telemetry;

pub use hub::Hub;
