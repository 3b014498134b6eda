//! Outbound line construction.
//!
//! Two numeric shapes go out on the wire and they are not interchangeable:
//!
//! - error form: `:<server> <code> <nick-or-*> :<text>\r\n`
//! - plain form: `:<server> <code> <nick> <text>\r\n`
//!
//! The plain form leaves the text untouched so callers can embed middle
//! parameters and their own trailing `:` (for example `#chan :topic`).
//! Command echoes carry the originating user's prefix instead.

use std::fmt;

use crate::response::Response;

/// `nick!user@host` source prefix for relayed commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPrefix<'a> {
    /// Nickname.
    pub nick: &'a str,
    /// Username.
    pub user: &'a str,
    /// Hostname.
    pub host: &'a str,
}

impl<'a> UserPrefix<'a> {
    /// Build a prefix from its parts.
    pub fn new(nick: &'a str, user: &'a str, host: &'a str) -> Self {
        Self { nick, user, host }
    }
}

impl fmt::Display for UserPrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nick, self.user, self.host)
    }
}

#[inline]
fn nick_or_star(nick: &str) -> &str {
    if nick.is_empty() { "*" } else { nick }
}

/// Error-form numeric reply.
pub fn error_reply(server: &str, response: Response, nick: &str, text: &str) -> String {
    format!(":{} {} {} :{}\r\n", server, response, nick_or_star(nick), text)
}

/// Plain-form numeric reply.
pub fn numeric_reply(server: &str, response: Response, nick: &str, text: &str) -> String {
    format!(":{} {} {} {}\r\n", server, response, nick_or_star(nick), text)
}

/// A command relayed on behalf of a user, e.g. `:a!b@c JOIN #chan`.
pub fn user_line(prefix: &UserPrefix<'_>, body: &str) -> String {
    format!(":{} {}\r\n", prefix, body)
}
