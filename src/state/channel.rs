//! Channel state: membership, privileges and modes.
//!
//! Membership sets hold nicknames, not sessions. A nickname change is
//! propagated into every set by [`Channel::rename_member`], so a channel
//! never refers to a session by anything that can dangle.

use chrono::{DateTime, Utc};
use ircrelay_proto::ChannelMode;
use std::collections::BTreeSet;

use crate::error::ChannelError;

/// A named group with membership and moderation state.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Bare name as first joined, without `#`.
    name: String,
    /// Empty when no topic is set.
    topic: String,
    /// Password supplied by the JOIN that created the channel.
    join_password: Option<String>,
    /// Mode `k` secret.
    key: Option<String>,
    /// Mode `l` cap.
    user_limit: Option<usize>,
    modes: BTreeSet<ChannelMode>,
    members: BTreeSet<String>,
    /// Always a subset of `members`.
    operators: BTreeSet<String>,
    invited: BTreeSet<String>,
    banned: BTreeSet<String>,
    created_at: DateTime<Utc>,
}

impl Channel {
    /// New channel with the default modes `+nt`.
    pub fn new(name: impl Into<String>, join_password: Option<String>) -> Self {
        Self {
            name: name.into(),
            topic: String::new(),
            join_password: join_password.filter(|p| !p.is_empty()),
            key: None,
            user_limit: None,
            modes: BTreeSet::from([ChannelMode::NoExternal, ChannelMode::TopicLock]),
            members: BTreeSet::new(),
            operators: BTreeSet::new(),
            invited: BTreeSet::new(),
            banned: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `#name`, as used on the wire.
    pub fn display_name(&self) -> String {
        format!("#{}", self.name)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // ========================================================================
    // Membership
    // ========================================================================

    pub fn is_member(&self, nick: &str) -> bool {
        self.members.contains(nick)
    }

    pub fn is_operator(&self, nick: &str) -> bool {
        self.operators.contains(nick)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// Entry check for a joining nickname.
    ///
    /// Checks run in order: ban, invite-only, limit, key, then the
    /// creation password. Both the key and the creation password must be
    /// satisfied when both are present.
    pub fn admit(&self, nick: &str, supplied: Option<&str>) -> Result<(), ChannelError> {
        if self.banned.contains(nick) {
            return Err(ChannelError::BannedFromChan);
        }
        if self.has_mode(ChannelMode::InviteOnly) && !self.invited.contains(nick) {
            return Err(ChannelError::InviteOnlyChan);
        }
        if let Some(limit) = self.user_limit
            && self.members.len() >= limit
        {
            return Err(ChannelError::ChannelIsFull);
        }
        if let Some(key) = &self.key
            && supplied != Some(key.as_str())
        {
            return Err(ChannelError::BadChannelKey);
        }
        if let Some(password) = &self.join_password
            && supplied != Some(password.as_str())
        {
            return Err(ChannelError::JoinRefused);
        }
        Ok(())
    }

    /// Add a member. Consumes any pending invitation.
    pub fn add_member(&mut self, nick: &str) {
        self.invited.remove(nick);
        self.members.insert(nick.to_string());
    }

    /// Remove a member and any operator status. Returns false if absent.
    pub fn remove_member(&mut self, nick: &str) -> bool {
        self.operators.remove(nick);
        self.members.remove(nick)
    }

    /// Grant operator status. Only members can be operators.
    pub fn add_operator(&mut self, nick: &str) -> bool {
        if !self.is_member(nick) {
            return false;
        }
        self.operators.insert(nick.to_string());
        true
    }

    pub fn remove_operator(&mut self, nick: &str) -> bool {
        self.operators.remove(nick)
    }

    pub fn invite(&mut self, nick: &str) {
        self.invited.insert(nick.to_string());
    }

    pub fn is_invited(&self, nick: &str) -> bool {
        self.invited.contains(nick)
    }

    /// Reserved for a ban mode; no command sets it yet.
    pub fn ban(&mut self, nick: &str) {
        self.banned.insert(nick.to_string());
    }

    /// Carry a nickname change through every set.
    pub fn rename_member(&mut self, old: &str, new: &str) {
        for set in [
            &mut self.members,
            &mut self.operators,
            &mut self.invited,
            &mut self.banned,
        ] {
            if set.remove(old) {
                set.insert(new.to_string());
            }
        }
    }

    // ========================================================================
    // Permission predicates
    // ========================================================================

    pub fn require_member(&self, nick: &str) -> Result<(), ChannelError> {
        if self.is_member(nick) {
            Ok(())
        } else {
            Err(ChannelError::NotOnChannel)
        }
    }

    /// Member and operator.
    pub fn require_operator(&self, nick: &str) -> Result<(), ChannelError> {
        self.require_member(nick)?;
        if self.is_operator(nick) {
            Ok(())
        } else {
            Err(ChannelError::ChanOpPrivsNeeded)
        }
    }

    pub fn can_set_topic(&self, nick: &str) -> Result<(), ChannelError> {
        self.require_member(nick)?;
        if self.has_mode(ChannelMode::TopicLock) && !self.is_operator(nick) {
            return Err(ChannelError::ChanOpPrivsNeeded);
        }
        Ok(())
    }

    pub fn can_speak(&self, nick: &str) -> Result<(), ChannelError> {
        if self.has_mode(ChannelMode::NoExternal) && !self.is_member(nick) {
            return Err(ChannelError::CannotSendToChan);
        }
        if self.has_mode(ChannelMode::Moderated) && !self.is_operator(nick) {
            return Err(ChannelError::CannotSendToChan);
        }
        Ok(())
    }

    // ========================================================================
    // Topic and modes
    // ========================================================================

    pub fn topic(&self) -> Option<&str> {
        if self.topic.is_empty() { None } else { Some(self.topic.as_str()) }
    }

    pub fn set_topic(&mut self, topic: &str) {
        self.topic = topic.to_string();
    }

    pub fn has_mode(&self, mode: ChannelMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Toggle a parameterless flag.
    pub fn set_flag(&mut self, mode: ChannelMode, on: bool) {
        if on {
            self.modes.insert(mode);
        } else {
            self.modes.remove(&mode);
        }
    }

    pub fn set_key(&mut self, key: Option<String>) {
        self.set_flag(ChannelMode::Key, key.is_some());
        self.key = key;
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.set_flag(ChannelMode::Limit, limit.is_some());
        self.user_limit = limit;
    }

    pub fn limit(&self) -> Option<usize> {
        self.user_limit
    }

    /// `+<flags>[ key][ limit]`, flags in letter order.
    pub fn mode_string(&self) -> String {
        let mut out = String::from("+");
        out.extend(self.modes.iter().map(ChannelMode::as_char));
        if let Some(key) = &self.key {
            out.push(' ');
            out.push_str(key);
        }
        if let Some(limit) = self.user_limit {
            out.push(' ');
            out.push_str(&limit.to_string());
        }
        out
    }

    /// Space-separated member list, operators prefixed with `@`.
    pub fn names(&self) -> String {
        self.members
            .iter()
            .map(|nick| {
                if self.is_operator(nick) {
                    format!("@{nick}")
                } else {
                    nick.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
