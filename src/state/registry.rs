//! Server-wide session and channel store.
//!
//! The registry is the single owner of every [`Session`] and [`Channel`].
//! The nickname index and channel membership sets only name sessions; they
//! never own them, so removing a session cannot leave a dangling entry
//! behind as long as removal goes through [`Registry::remove`].

use ircrelay_proto::ChannelExt;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::channel::Channel;
use super::session::{Session, SessionId};

#[derive(Debug, Default)]
pub struct Registry {
    next_id: u64,
    sessions: HashMap<SessionId, Session>,
    /// Registered sessions only.
    nicks: HashMap<String, SessionId>,
    /// Keyed by lowercase bare name.
    channels: HashMap<String, Channel>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the id for a connection about to be accepted.
    pub fn allocate_id(&mut self) -> SessionId {
        self.next_id += 1;
        SessionId::new(self.next_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id(), session);
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Erase a session and its nickname index entry.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        self.unbind_nick(&session.nickname, id);
        Some(session)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Snapshot of live ids, safe to iterate while removing.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }

    // ========================================================================
    // Nickname index
    // ========================================================================

    pub fn find_nick(&self, nick: &str) -> Option<SessionId> {
        self.nicks.get(nick).copied()
    }

    /// Another registered session holds `nick`.
    pub fn nick_taken(&self, nick: &str, except: SessionId) -> bool {
        self.find_nick(nick).is_some_and(|holder| holder != except)
    }

    /// Point `nick` at `id` unless another session already holds it.
    ///
    /// A doubly colliding nickname is shared; the index keeps the first
    /// holder until it leaves.
    pub fn bind_nick(&mut self, nick: &str, id: SessionId) {
        self.nicks.entry(nick.to_string()).or_insert(id);
    }

    /// Drop `nick` from the index if it still points at `id`, handing it to
    /// the oldest other registered session sharing the nickname.
    pub fn unbind_nick(&mut self, nick: &str, id: SessionId) {
        if self.nicks.get(nick) != Some(&id) {
            return;
        }
        self.nicks.remove(nick);

        let successor = self
            .sessions
            .iter()
            .filter(|(other, session)| {
                **other != id && session.is_registered() && session.nickname == nick
            })
            .map(|(other, _)| *other)
            .min();
        if let Some(successor) = successor {
            debug!(session = %successor, nick = %nick, "Nickname index handed over");
            self.nicks.insert(nick.to_string(), successor);
        }
    }

    /// Move `id` from `old` to `new` in the index and every joined channel.
    pub fn rename(&mut self, id: SessionId, old: &str, new: &str) {
        self.unbind_nick(old, id);
        self.bind_nick(new, id);

        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        session.nickname = new.to_string();
        for key in &session.channels {
            if let Some(channel) = self.channels.get_mut(key) {
                channel.rename_member(old, new);
            }
        }
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Look up by wire name (`#chan`) or bare name, case-insensitively.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&channel_key(name))
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&channel_key(name))
    }

    pub fn insert_channel(&mut self, channel: Channel) -> String {
        let key = channel.name().channel_key();
        debug!(
            channel = %channel.display_name(),
            created_at = %channel.created_at(),
            "Channel created"
        );
        self.channels.insert(key.clone(), channel);
        key
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Take `id` out of a channel, destroying the channel once empty.
    pub fn part_channel(&mut self, id: SessionId, key: &str) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        session.channels.remove(key);

        if let Some(channel) = self.channels.get_mut(key) {
            channel.remove_member(&session.nickname);
            if channel.is_empty() {
                debug!(channel = %channel.display_name(), "Channel destroyed");
                self.channels.remove(key);
            }
        }
    }

    // ========================================================================
    // Delivery
    // ========================================================================

    pub fn send_to(&self, id: SessionId, line: &str) {
        if let Some(session) = self.sessions.get(&id) {
            session.send(line);
        }
    }

    /// Send `line` to every member of the channel at `key`, except `except`.
    pub fn broadcast(&self, key: &str, line: &str, except: Option<&str>) {
        let Some(channel) = self.channels.get(key) else {
            return;
        };
        for nick in channel.members() {
            if Some(nick) == except {
                continue;
            }
            if let Some(id) = self.find_nick(nick) {
                self.send_to(id, line);
            }
        }
    }

    /// Distinct sessions sharing at least one channel with `id`, excluding `id`.
    pub fn channel_peers(&self, id: SessionId) -> BTreeSet<SessionId> {
        let Some(session) = self.sessions.get(&id) else {
            return BTreeSet::new();
        };
        session
            .channels
            .iter()
            .filter_map(|key| self.channels.get(key))
            .flat_map(|channel| channel.members())
            .filter_map(|nick| self.find_nick(nick))
            .filter(|peer| *peer != id)
            .collect()
    }
}

fn channel_key(name: &str) -> String {
    name.channel_name().unwrap_or(name).channel_key()
}
