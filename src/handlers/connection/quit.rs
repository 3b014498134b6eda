//! QUIT handler and the session removal path.
//!
//! Every way a session can end (QUIT, idle timeout, peer close, bad
//! password, shutdown) goes through [`remove_session`], so channels, the
//! nickname index and the transport are always released in the same order.

use ircrelay_proto::{Params, encode};
use tracing::info;

use crate::handlers::{Context, PostRegHandler};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Registry, SessionId};

/// Handler for QUIT command.
pub struct QuitHandler;

impl PostRegHandler for QuitHandler {
    fn handle(&self, _ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let reason = params.get(0).filter(|r| !r.is_empty()).map(str::to_string);
        // The dispatcher performs the removal.
        Err(HandlerError::Quit(reason))
    }
}

/// How a removed session is announced to the channels it shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure<'a> {
    /// Send `QUIT[ :reason]` to every distinct channel peer.
    Quit(Option<&'a str>),
    /// Remove without telling anyone.
    Silent,
}

/// Remove a session.
///
/// 1. Announce the QUIT to each distinct peer once.
/// 2. Leave every channel, destroying the ones left empty.
/// 3. Stop the reader and close the writer.
/// 4. Erase the session and its nickname index entry.
///
/// Unknown ids are ignored, so a stale event for an already removed
/// session is harmless.
pub fn remove_session(registry: &mut Registry, id: SessionId, departure: Departure<'_>) {
    let Some(session) = registry.session(id) else {
        return;
    };

    if let Departure::Quit(reason) = departure
        && session.is_registered()
    {
        let body = match reason {
            Some(reason) => format!("QUIT :{reason}"),
            None => "QUIT".to_string(),
        };
        let line = encode::user_line(&session.prefix(), &body);
        for peer in registry.channel_peers(id) {
            registry.send_to(peer, &line);
        }
    }

    let joined: Vec<String> = session.channels.iter().cloned().collect();
    for key in &joined {
        registry.part_channel(id, key);
    }

    if let Some(session) = registry.session_mut(id) {
        session.mark_removed();
        session.close_transport();
    }

    if let Some(session) = registry.remove(id) {
        let reason = match departure {
            Departure::Quit(reason) => reason.unwrap_or(""),
            Departure::Silent => "",
        };
        info!(session = %id, nick = %session.nickname, reason, "Client disconnected");
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_quit_announces_once_per_peer() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #a\r\nJOIN #b\r\n");
        h.send(bob, "JOIN #a\r\nJOIN #b\r\n");
        h.drain_all(&[&ta, &tb]);

        h.send(bob, "QUIT :gone fishing\r\n");

        assert_eq!(ta.take(), vec![":bob!bob@127.0.0.1 QUIT :gone fishing"]);
        assert!(tb.is_closed());
        assert!(tb.take().is_empty());
        assert!(h.hub.registry().session(bob).is_none());
        assert_eq!(h.hub.registry().find_nick("bob"), None);
        assert!(!h.hub.registry().channel("#a").unwrap().is_member("bob"));
    }

    #[test]
    fn test_quit_without_reason_and_channel_teardown() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        h.send(alice, "JOIN #solo\r\n");
        ta.take();

        h.send(alice, "QUIT\r\n");
        assert!(h.hub.registry().channel("#solo").is_none());
        assert_eq!(h.hub.registry().session_count(), 0);
    }

    #[test]
    fn test_lines_after_quit_are_dropped() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        tb.take();

        h.send(alice, "QUIT :bye\r\nPRIVMSG bob :ghost\r\n");
        assert!(tb.take().is_empty());
        assert!(h.hub.registry().session(alice).is_none());
        assert!(h.hub.registry().session(bob).is_some());
    }
}
