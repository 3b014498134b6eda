//! Command handler context.
//!
//! Defines the `Context<'a>` struct passed to every handler and the
//! [`PostRegHandler`] trait implemented by the post-registration commands.

use ircrelay_proto::{Params, Response, encode};
use std::time::Instant;

use crate::config::LimitsConfig;
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Registry, ServerInfo, Session, SessionId};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Session the command came from.
    pub id: SessionId,
    /// Sessions, nick index and channels.
    pub registry: &'a mut Registry,
    /// Server identity.
    pub server: &'a ServerInfo,
    /// Configured limits.
    pub limits: &'a LimitsConfig,
    /// Time the batch being processed was received.
    pub now: Instant,
}

impl<'a> Context<'a> {
    pub fn new(
        id: SessionId,
        registry: &'a mut Registry,
        server: &'a ServerInfo,
        limits: &'a LimitsConfig,
        now: Instant,
    ) -> Self {
        Self {
            id,
            registry,
            server,
            limits,
            now,
        }
    }

    /// The originating session.
    pub fn me(&self) -> Result<&Session, HandlerError> {
        self.registry.session(self.id).ok_or(HandlerError::SessionGone)
    }

    pub fn me_mut(&mut self) -> Result<&mut Session, HandlerError> {
        self.registry
            .session_mut(self.id)
            .ok_or(HandlerError::SessionGone)
    }

    /// Current nickname of the originator, owned so the registry can be
    /// mutated while it is held.
    pub fn nick(&self) -> Result<String, HandlerError> {
        self.me().map(|s| s.nickname.clone())
    }

    #[inline]
    pub fn server_name(&self) -> &str {
        &self.server.name
    }

    /// Send a fully encoded line to the originator.
    pub fn reply(&self, line: &str) {
        self.registry.send_to(self.id, line);
    }

    /// Send a plain-form numeric to the originator.
    pub fn numeric(&self, response: Response, text: &str) -> HandlerResult {
        let me = self.me()?;
        me.send(&encode::numeric_reply(
            self.server_name(),
            response,
            me.reply_nick(),
            text,
        ));
        Ok(())
    }

    /// Send the error-form reply for `err` to the originator, if it has one.
    pub fn reply_error(&self, err: &HandlerError) {
        let Ok(me) = self.me() else {
            return;
        };
        if let Some(line) = err.to_reply(self.server_name(), me.reply_nick()) {
            me.send(&line);
        }
    }

    /// Encode `body` with the originator's prefix.
    pub fn user_line(&self, body: &str) -> Result<String, HandlerError> {
        Ok(encode::user_line(&self.me()?.prefix(), body))
    }
}

/// A command valid only after registration.
///
/// Handlers run to completion against the registry. On an early return
/// they leave shared state as it was before the command.
pub trait PostRegHandler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult;
}
