//! The synchronous core.
//!
//! [`Hub`] owns the [`Registry`] and is driven by the event loop with
//! plain method calls: a connection arrives, bytes arrive, a connection
//! closes, the sweep timer fires. Every call runs to completion without
//! awaiting, so one call never observes another half-done.

use bytes::Bytes;
use ircrelay_proto::FeedOutcome;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::LimitsConfig;
use crate::handlers::{self, Context, Departure, Flow};
use crate::network::Transport;
use crate::state::{Registry, ServerInfo, Session, SessionId};

pub struct Hub {
    registry: Registry,
    server: ServerInfo,
    limits: LimitsConfig,
}

impl Hub {
    pub fn new(server: ServerInfo, limits: LimitsConfig) -> Self {
        Self {
            registry: Registry::new(),
            server,
            limits,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn server(&self) -> &ServerInfo {
        &self.server
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Reserve an id for a connection that is being set up.
    pub fn allocate_id(&mut self) -> SessionId {
        self.registry.allocate_id()
    }

    /// Register a freshly accepted connection.
    pub fn connect(
        &mut self,
        id: SessionId,
        transport: Box<dyn Transport>,
        hostname: String,
        now: Instant,
    ) {
        info!(session = %id, host = %hostname, "Client connected");
        let session = Session::new(id, hostname, transport, self.limits.max_buffer, now);
        self.registry.insert(session);
    }

    /// Feed bytes read from a connection and process every complete line.
    pub fn receive(&mut self, id: SessionId, bytes: &Bytes, now: Instant) -> Flow {
        let Some(session) = self.registry.session_mut(id) else {
            debug!(session = %id, "Data for unknown session");
            return Flow::Removed;
        };

        if let FeedOutcome::Overflowed { discarded } = session.feed(bytes) {
            warn!(session = %id, discarded, "Inbound buffer overflow, partial line discarded");
        }

        let mut ctx = Context::new(id, &mut self.registry, &self.server, &self.limits, now);
        loop {
            let Some(session) = ctx.registry.session_mut(id) else {
                return Flow::Removed;
            };
            let registered = session.is_registered();
            let Some(line) = session.next_message() else {
                break;
            };

            let flow = if registered {
                handlers::dispatch(&mut ctx, &line)
            } else {
                handlers::handle_registration_line(&mut ctx, &line)
            };
            if flow == Flow::Removed {
                return Flow::Removed;
            }
        }

        handlers::finish_batch(&mut ctx)
    }

    /// The peer closed the stream or the read failed.
    pub fn disconnect(&mut self, id: SessionId) {
        if !self.registry.contains(id) {
            return;
        }
        debug!(session = %id, "Connection closed by peer");
        handlers::remove_session(
            &mut self.registry,
            id,
            Departure::Quit(Some("Connection closed")),
        );
    }

    /// Remove every session idle for longer than the configured timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_idle(&mut self, now: Instant) -> usize {
        let timeout = self.limits.idle_timeout();
        let idle: Vec<SessionId> = self
            .registry
            .session_ids()
            .into_iter()
            .filter(|id| {
                self.registry
                    .session(*id)
                    .is_some_and(|s| s.idle_for(now) > timeout)
            })
            .collect();

        for id in &idle {
            info!(session = %id, "Idle timeout");
            handlers::remove_session(&mut self.registry, *id, Departure::Quit(Some("Idle")));
        }
        idle.len()
    }

    /// Close every session through the removal path.
    pub fn shutdown(&mut self) {
        let ids = self.registry.session_ids();
        info!(sessions = ids.len(), "Closing all sessions");
        for id in ids {
            handlers::remove_session(
                &mut self.registry,
                id,
                Departure::Quit(Some("Server shutting down")),
            );
        }
    }
}
