//! Drives a [`Hub`] with recording transports.

use bytes::Bytes;
use std::time::{Duration, Instant};

use crate::config::LimitsConfig;
use crate::hub::Hub;
use crate::network::testing::RecordingTransport;
use crate::state::{ServerInfo, SessionId};

pub const PASSWORD: &str = "hunter2";

pub struct Harness {
    pub hub: Hub,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            hub: Hub::new(ServerInfo::new("ircserv", PASSWORD), LimitsConfig::default()),
            now: Instant::now(),
        }
    }

    /// Accept a connection without registering it.
    pub fn connect(&mut self) -> (SessionId, RecordingTransport) {
        let transport = RecordingTransport::new();
        let id = self.hub.allocate_id();
        self.hub
            .connect(id, Box::new(transport.clone()), "127.0.0.1".into(), self.now);
        (id, transport)
    }

    /// Accept and register with username equal to `nick`, dropping the burst.
    pub fn register(&mut self, nick: &str) -> (SessionId, RecordingTransport) {
        let (id, transport) = self.connect();
        self.send(
            id,
            &format!("PASS {PASSWORD}\r\nNICK {nick}\r\nUSER {nick} 0 * :{nick}\r\n"),
        );
        transport.take();
        (id, transport)
    }

    pub fn send(&mut self, id: SessionId, raw: &str) {
        self.hub
            .receive(id, &Bytes::copy_from_slice(raw.as_bytes()), self.now);
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn sweep(&mut self) -> usize {
        self.hub.sweep_idle(self.now)
    }

    pub fn drain_all(&self, transports: &[&RecordingTransport]) {
        for transport in transports {
            transport.take();
        }
    }
}
