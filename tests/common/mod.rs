//! Integration test common infrastructure.
//!
//! Provides utilities for spawning the relay binary and driving it with
//! raw-line test clients.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{PASSWORD, TestServer};
