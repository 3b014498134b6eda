//! Per-connection session state.
//!
//! A [`Session`] exists from accept until removal. It carries the
//! handshake fields, the reassembly buffer, the set of joined channels and
//! the outbound transport.
//!
//! ## Registration
//!
//! ```text
//! ┌──────────────┐  PASS/NICK/USER  ┌─────────────┐  pass ∧ nick ∧ user  ┌────────────┐
//! │ Unregistered │ ───────────────▶ │ Registering │ ───────────────────▶ │ Registered │
//! └──────────────┘                  └─────────────┘                      └────────────┘
//!         │                                │                                   │
//!         └────────────────────────────────┴──────────── removal ──────────────┴──▶ Removed
//! ```
//!
//! Once registered a session never goes back; the only exit is removal.

use ircrelay_proto::{FeedOutcome, LineFramer, UserPrefix};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::network::Transport;

/// Stable identifier for a connection. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which handshake commands have been seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationFlags {
    pub has_pass: bool,
    pub has_nick: bool,
    pub has_user: bool,
}

impl RegistrationFlags {
    /// All three handshake commands arrived.
    pub fn complete(&self) -> bool {
        self.has_pass && self.has_nick && self.has_user
    }

    /// PASS and NICK arrived but USER did not.
    pub fn missing_only_user(&self) -> bool {
        self.has_pass && self.has_nick && !self.has_user
    }

    fn any(&self) -> bool {
        self.has_pass || self.has_nick || self.has_user
    }
}

/// Registration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered,
    Removed,
}

/// One live connection.
pub struct Session {
    id: SessionId,
    pub nickname: String,
    pub username: String,
    pub realname: String,
    pub hostname: String,
    /// Password as supplied with PASS.
    pub password: String,
    /// Lowercase keys of joined channels.
    pub channels: BTreeSet<String>,
    pub last_activity: Instant,
    flags: RegistrationFlags,
    state: RegistrationState,
    framer: LineFramer,
    transport: Box<dyn Transport>,
}

impl Session {
    pub fn new(
        id: SessionId,
        hostname: String,
        transport: Box<dyn Transport>,
        max_buffer: usize,
        now: Instant,
    ) -> Self {
        Self {
            id,
            nickname: String::new(),
            username: String::new(),
            realname: String::new(),
            hostname,
            password: String::new(),
            channels: BTreeSet::new(),
            last_activity: now,
            flags: RegistrationFlags::default(),
            state: RegistrationState::Unregistered,
            framer: LineFramer::with_max_len(max_buffer),
            transport,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn flags(&self) -> RegistrationFlags {
        self.flags
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state == RegistrationState::Registered
    }

    pub fn set_password(&mut self, password: String) {
        self.password = password;
        self.flags.has_pass = true;
        self.after_handshake_step();
    }

    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = nickname;
        self.flags.has_nick = true;
        self.after_handshake_step();
    }

    pub fn set_user(&mut self, username: String, realname: String) {
        self.username = username;
        self.realname = realname;
        self.flags.has_user = true;
        self.after_handshake_step();
    }

    fn after_handshake_step(&mut self) {
        if self.state == RegistrationState::Unregistered && self.flags.any() {
            self.state = RegistrationState::Registering;
        }
    }

    /// Enter the registered state. Requires all three flags.
    pub fn mark_registered(&mut self) -> bool {
        if !self.flags.complete() || self.state == RegistrationState::Removed {
            return false;
        }
        self.state = RegistrationState::Registered;
        true
    }

    pub(crate) fn mark_removed(&mut self) {
        self.state = RegistrationState::Removed;
    }

    /// Source prefix for relayed commands.
    pub fn prefix(&self) -> UserPrefix<'_> {
        UserPrefix::new(&self.nickname, &self.username, &self.hostname)
    }

    /// Nickname for the target field of numerics (`*` before NICK).
    pub fn reply_nick(&self) -> &str {
        if self.nickname.is_empty() { "*" } else { &self.nickname }
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    pub fn feed(&mut self, bytes: &[u8]) -> FeedOutcome {
        self.framer.feed(bytes)
    }

    pub fn next_message(&mut self) -> Option<String> {
        self.framer.next_message()
    }

    /// Best-effort write. Failures are logged and otherwise ignored.
    pub fn send(&self, line: &str) {
        if let Err(error) = self.transport.send(line) {
            warn!(session = %self.id, nick = %self.nickname, %error, "Dropped outbound line");
        }
    }

    pub(crate) fn close_transport(&self) {
        self.transport.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("state", &self.state)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}
