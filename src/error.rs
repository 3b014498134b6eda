//! Unified error handling for ircrelay.
//!
//! Protocol, lookup and permission failures are values of [`HandlerError`]
//! and turn into exactly one error-form numeric for the originator. They
//! never end the session. Transport failures are [`TransportError`] and
//! are only ever logged.

use ircrelay_proto::{Response, encode};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}: not enough parameters")]
    NeedMoreParams(&'static str),

    #[error("{0}: no recipient given")]
    NoRecipient(&'static str),

    #[error("no text to send")]
    NoTextToSend,

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("user modes are not supported: {0}")]
    UserModesUnsupported(String),

    #[error("password mismatch")]
    PasswordMismatch,

    #[error("{channel}: {source}")]
    Channel {
        channel: String,
        #[source]
        source: ChannelError,
    },

    #[error("internal error: session vanished mid-command")]
    SessionGone,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Wrap a channel failure with the channel's display name (`#name`).
    pub fn channel(channel: impl Into<String>, source: ChannelError) -> Self {
        Self::Channel {
            channel: channel.into(),
            source,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::NoRecipient(_) => "no_recipient",
            Self::NoTextToSend => "no_text_to_send",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::UserModesUnsupported(_) => "user_modes_unsupported",
            Self::PasswordMismatch => "password_mismatch",
            Self::Channel { source, .. } => source.error_code(),
            Self::SessionGone => "session_gone",
            Self::Quit(_) => "quit",
        }
    }

    /// Numeric carried by the reply, if the error produces one.
    pub fn response(&self) -> Option<Response> {
        let response = match self {
            Self::NeedMoreParams(_) => Response::ERR_NEEDMOREPARAMS,
            Self::NoRecipient(_) => Response::ERR_NORECIPIENT,
            Self::NoTextToSend => Response::ERR_NOTEXTTOSEND,
            Self::NoSuchNick(_) => Response::ERR_NOSUCHNICK,
            Self::NoSuchChannel(_) => Response::ERR_NOSUCHCHANNEL,
            Self::NoNicknameGiven => Response::ERR_NONICKNAMEGIVEN,
            Self::ErroneousNickname(_) => Response::ERR_ERRONEUSNICKNAME,
            Self::NicknameInUse(_) => Response::ERR_NICKNAMEINUSE,
            Self::UserModesUnsupported(_) => Response::ERR_UNKNOWNMODE,
            Self::PasswordMismatch => Response::ERR_PASSWDMISMATCH,
            Self::Channel { source, .. } => source.response(),

            // These errors don't get client-visible replies
            Self::SessionGone | Self::Quit(_) => return None,
        };
        Some(response)
    }

    /// Render the error-form numeric for `nick`.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_reply(&self, server_name: &str, nick: &str) -> Option<String> {
        let response = self.response()?;
        let text = match self {
            Self::NeedMoreParams(cmd) => format!("{cmd} :Not enough parameters"),
            Self::NoRecipient(cmd) => format!("No recipient given ({cmd})"),
            Self::NoTextToSend => "No text to send".to_string(),
            Self::NoSuchNick(target) => format!("{target} :No such nick/channel"),
            Self::NoSuchChannel(channel) => format!("{channel} :No such channel"),
            Self::NoNicknameGiven => "No nickname given".to_string(),
            Self::ErroneousNickname(bad) => format!("{bad} :Erroneous nickname"),
            Self::NicknameInUse(taken) => format!("{taken} :Nickname is already in use"),
            Self::UserModesUnsupported(target) => format!("{target} :User modes not implemented"),
            Self::PasswordMismatch => "Password incorrect".to_string(),
            Self::Channel { channel, source } => source.reply_text(channel),
            Self::SessionGone | Self::Quit(_) => return None,
        };
        Some(encode::error_reply(server_name, response, nick, &text))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Channel Errors (predicates and membership checks)
// ============================================================================

/// Channel operation errors.
///
/// Returned by [`crate::state::Channel`] predicates; handlers wrap them
/// with the channel name via [`HandlerError::channel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("not on channel")]
    NotOnChannel,

    #[error("you're not channel operator")]
    ChanOpPrivsNeeded,

    #[error("user {0} is not on that channel")]
    UserNotInChannel(String),

    #[error("user {0} is already on that channel")]
    UserOnChannel(String),

    #[error("cannot send to channel")]
    CannotSendToChan,

    #[error("cannot join channel (+b)")]
    BannedFromChan,

    #[error("cannot join channel (+i)")]
    InviteOnlyChan,

    #[error("cannot join channel (+l)")]
    ChannelIsFull,

    #[error("cannot join channel (+k)")]
    BadChannelKey,

    #[error("cannot join channel")]
    JoinRefused,
}

impl ChannelError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotOnChannel => "not_on_channel",
            Self::ChanOpPrivsNeeded => "chanop_privs_needed",
            Self::UserNotInChannel(_) => "user_not_in_channel",
            Self::UserOnChannel(_) => "user_on_channel",
            Self::CannotSendToChan => "cannot_send_to_chan",
            Self::BannedFromChan => "banned_from_chan",
            Self::InviteOnlyChan => "invite_only_chan",
            Self::ChannelIsFull => "channel_is_full",
            Self::BadChannelKey => "bad_channel_key",
            Self::JoinRefused => "join_refused",
        }
    }

    /// Numeric carried by the reply.
    pub fn response(&self) -> Response {
        match self {
            Self::NotOnChannel => Response::ERR_NOTONCHANNEL,
            Self::ChanOpPrivsNeeded => Response::ERR_CHANOPRIVSNEEDED,
            Self::UserNotInChannel(_) => Response::ERR_USERNOTINCHANNEL,
            Self::UserOnChannel(_) => Response::ERR_USERONCHANNEL,
            Self::CannotSendToChan => Response::ERR_CANNOTSENDTOCHAN,
            Self::BannedFromChan => Response::ERR_BANNEDFROMCHAN,
            Self::InviteOnlyChan => Response::ERR_INVITEONLYCHAN,
            Self::ChannelIsFull => Response::ERR_CHANNELISFULL,
            Self::BadChannelKey => Response::ERR_BADCHANNELKEY,
            Self::JoinRefused => Response::ERR_NOSUCHCHANNEL,
        }
    }

    fn reply_text(&self, channel: &str) -> String {
        match self {
            Self::NotOnChannel => format!("{channel} :You're not on that channel"),
            Self::ChanOpPrivsNeeded => format!("{channel} :You're not channel operator"),
            Self::UserNotInChannel(target) => {
                format!("{target} {channel} :They aren't on that channel")
            }
            Self::UserOnChannel(target) => format!("{target} {channel} :is already on channel"),
            Self::CannotSendToChan => format!("{channel} :Cannot send to channel"),
            Self::BannedFromChan => format!("{channel} :Cannot join channel (+b)"),
            Self::InviteOnlyChan => format!("{channel} :Cannot join channel (+i)"),
            Self::ChannelIsFull => format!("{channel} :Cannot join channel (+l)"),
            Self::BadChannelKey => format!("{channel} :Cannot join channel (+k)"),
            Self::JoinRefused => format!("{channel} :Cannot join channel"),
        }
    }
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Failure to hand a line to a peer. Logged, never answered.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send queue full")]
    QueueFull,

    #[error("connection closed")]
    Closed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(HandlerError::NeedMoreParams("JOIN").error_code(), "need_more_params");
        assert_eq!(
            HandlerError::channel("#c", ChannelError::ChannelIsFull).error_code(),
            "channel_is_full"
        );
    }

    #[test]
    fn test_need_more_params_reply() {
        let reply = HandlerError::NeedMoreParams("KICK").to_reply("ircserv", "bob");
        assert_eq!(reply.as_deref(), Some(":ircserv 461 bob :KICK :Not enough parameters\r\n"));
    }

    #[test]
    fn test_no_recipient_names_command() {
        let reply = HandlerError::NoRecipient("NOTICE").to_reply("ircserv", "bob");
        assert_eq!(reply.as_deref(), Some(":ircserv 411 bob :No recipient given (NOTICE)\r\n"));
    }

    #[test]
    fn test_password_mismatch_without_nick() {
        let reply = HandlerError::PasswordMismatch.to_reply("ircserv", "");
        assert_eq!(reply.as_deref(), Some(":ircserv 464 * :Password incorrect\r\n"));
    }

    #[test]
    fn test_channel_error_reply() {
        let reply = HandlerError::channel("#rust", ChannelError::ChannelIsFull)
            .to_reply("ircserv", "carol");
        assert_eq!(
            reply.as_deref(),
            Some(":ircserv 471 carol :#rust :Cannot join channel (+l)\r\n")
        );

        let reply = HandlerError::channel("#rust", ChannelError::UserNotInChannel("dave".into()))
            .to_reply("ircserv", "bob");
        assert_eq!(
            reply.as_deref(),
            Some(":ircserv 441 bob :dave #rust :They aren't on that channel\r\n")
        );
    }

    #[test]
    fn test_join_refused_uses_no_such_channel() {
        let err = HandlerError::channel("#rust", ChannelError::JoinRefused);
        assert_eq!(err.response(), Some(Response::ERR_NOSUCHCHANNEL));
    }

    #[test]
    fn test_quit_and_internal_errors_have_no_reply() {
        assert!(HandlerError::Quit(None).to_reply("ircserv", "bob").is_none());
        assert!(HandlerError::SessionGone.to_reply("ircserv", "bob").is_none());
    }
}
