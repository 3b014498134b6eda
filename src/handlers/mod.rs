//! IRC command handlers.
//!
//! Unregistered sessions are served by [`connection`], which only knows
//! PASS, NICK and USER. Once registered, every framed line goes through
//! [`dispatch`], which maps the command keyword to a [`PostRegHandler`].
//!
//! A handler error becomes exactly one error-form numeric for the
//! originator and never ends the session. The one exception is QUIT,
//! which is reported as [`HandlerError::Quit`] and turned into removal here.

mod channel;
mod connection;
mod context;
mod messaging;
mod mode;

pub use channel::{InviteHandler, JoinHandler, KickHandler, PartHandler, TopicHandler};
pub use connection::{
    Departure, NickHandler, QuitHandler, finish_batch, handle_registration_line, remove_session,
    resolve_nickname,
};
pub use context::{Context, PostRegHandler};
pub use messaging::{NoticeHandler, PrivmsgHandler};
pub use mode::ModeHandler;

use ircrelay_proto::{CommandCode, Params};
use tracing::debug;

use crate::error::HandlerError;

/// What became of the session after a line was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading.
    Continue,
    /// The session was removed; drop the rest of its input.
    Removed,
}

/// Handler for a command code. PONG and unknown commands have none.
pub fn handler_for(code: CommandCode) -> Option<&'static dyn PostRegHandler> {
    let handler: &'static dyn PostRegHandler = match code {
        CommandCode::Join => &JoinHandler,
        CommandCode::Privmsg => &PrivmsgHandler,
        CommandCode::Notice => &NoticeHandler,
        CommandCode::Nick => &NickHandler,
        CommandCode::Quit => &QuitHandler,
        CommandCode::Part => &PartHandler,
        CommandCode::Kick => &KickHandler,
        CommandCode::Invite => &InviteHandler,
        CommandCode::Topic => &TopicHandler,
        CommandCode::Mode => &ModeHandler,
        CommandCode::Pong | CommandCode::NoCommand => return None,
    };
    Some(handler)
}

/// Run one framed line from a registered session.
pub fn dispatch(ctx: &mut Context<'_>, line: &str) -> Flow {
    let params = Params::parse(line);
    let Some(keyword) = params.command() else {
        return Flow::Continue;
    };
    let code = CommandCode::parse(keyword);

    if code.refreshes_activity() {
        let now = ctx.now;
        if let Ok(me) = ctx.me_mut() {
            me.touch(now);
        }
    }

    let Some(handler) = handler_for(code) else {
        debug!(session = %ctx.id, command = %keyword, "Ignoring command");
        return Flow::Continue;
    };

    debug!(session = %ctx.id, command = %code, args = params.len(), "Dispatching command");

    match handler.handle(ctx, &params) {
        Ok(()) => Flow::Continue,
        Err(HandlerError::Quit(reason)) => {
            remove_session(ctx.registry, ctx.id, Departure::Quit(reason.as_deref()));
            Flow::Removed
        }
        Err(err) => {
            debug!(
                session = %ctx.id,
                command = %code,
                error = %err,
                code = err.error_code(),
                "Command failed"
            );
            ctx.reply_error(&err);
            Flow::Continue
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
