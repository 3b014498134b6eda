//! Command classification.
//!
//! Registered sessions speak the closed command set in [`CommandCode`].
//! Before registration only [`RegistrationCommand`] lines are understood.
//! Keywords are matched case-sensitively in both phases.

use std::fmt;

use crate::error::{ProtocolError, Result};
use crate::params::Params;

/// Commands understood after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// `JOIN #chan [key]`
    Join,
    /// `PRIVMSG target :text`
    Privmsg,
    /// `NOTICE target :text`
    Notice,
    /// `NICK newnick`
    Nick,
    /// `QUIT [:reason]`
    Quit,
    /// `PART #chan [:reason]`
    Part,
    /// `KICK #chan nick [:reason]`
    Kick,
    /// `INVITE nick #chan`
    Invite,
    /// `TOPIC #chan [:topic]`
    Topic,
    /// `MODE #chan [modestring [params...]]`
    Mode,
    /// `PONG` keep-alive.
    Pong,
    /// Anything else. Ignored.
    NoCommand,
}

impl CommandCode {
    /// Map a command keyword to its code.
    pub fn parse(keyword: &str) -> Self {
        match keyword {
            "JOIN" => Self::Join,
            "PRIVMSG" => Self::Privmsg,
            "NOTICE" => Self::Notice,
            "NICK" => Self::Nick,
            "QUIT" => Self::Quit,
            "PART" => Self::Part,
            "KICK" => Self::Kick,
            "INVITE" => Self::Invite,
            "TOPIC" => Self::Topic,
            "MODE" => Self::Mode,
            "PONG" => Self::Pong,
            _ => Self::NoCommand,
        }
    }

    /// Wire keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Privmsg => "PRIVMSG",
            Self::Notice => "NOTICE",
            Self::Nick => "NICK",
            Self::Quit => "QUIT",
            Self::Part => "PART",
            Self::Kick => "KICK",
            Self::Invite => "INVITE",
            Self::Topic => "TOPIC",
            Self::Mode => "MODE",
            Self::Pong => "PONG",
            Self::NoCommand => "*",
        }
    }

    /// Whether handling this command counts as session activity.
    pub fn refreshes_activity(&self) -> bool {
        !matches!(self, Self::Quit | Self::Pong)
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handshake lines accepted before registration completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationCommand {
    /// `PASS <password>`
    Pass(String),
    /// `NICK <nickname>`
    Nick(String),
    /// `USER <user> <mode> <unused> :<realname>`
    User {
        /// Username.
        username: String,
        /// Real name. Falls back to the username when omitted.
        realname: String,
    },
}

impl RegistrationCommand {
    /// Interpret a framed line during the handshake.
    ///
    /// Returns `Ok(None)` for lines that are not handshake commands.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let params = Params::parse(line);
        let command = match params.command() {
            Some(command) => command,
            None => return Ok(None),
        };

        match command {
            "PASS" => {
                let password = params
                    .get(0)
                    .filter(|p| !p.is_empty())
                    .ok_or(ProtocolError::NeedMoreParams("PASS"))?;
                Ok(Some(Self::Pass(password.to_string())))
            }
            "NICK" => {
                let nick = params
                    .get(0)
                    .filter(|n| !n.is_empty())
                    .ok_or(ProtocolError::NeedMoreParams("NICK"))?;
                Ok(Some(Self::Nick(nick.to_string())))
            }
            "USER" => {
                if params.len() < 3 {
                    return Err(ProtocolError::NeedMoreParams("USER"));
                }
                let username = params.get(0).unwrap_or_default().to_string();
                let realname = match params.get(3) {
                    Some(realname) if !realname.is_empty() => realname.to_string(),
                    _ => username.clone(),
                };
                Ok(Some(Self::User { username, realname }))
            }
            _ => Ok(None),
        }
    }
}
