//! Registration handshake.
//!
//! Before registration only PASS, NICK and USER are understood; any other
//! line is ignored without a reply. Registration completes as soon as all
//! three have arrived. A client that sent PASS and NICK but no USER by the
//! end of a receive batch gets username and realname set to its nickname.

use ircrelay_proto::{NickExt, RegistrationCommand};
use tracing::{debug, info, warn};

use super::nick::resolve_nickname;
use super::quit::{Departure, remove_session};
use super::welcome::welcome_burst;
use crate::error::HandlerError;
use crate::handlers::{Context, Flow};

/// Apply one framed line from an unregistered session.
pub fn handle_registration_line(ctx: &mut Context<'_>, line: &str) -> Flow {
    let command = match RegistrationCommand::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => {
            debug!(session = %ctx.id, "Ignoring line before registration");
            return Flow::Continue;
        }
        Err(error) => {
            debug!(session = %ctx.id, %error, "Malformed handshake line");
            return Flow::Continue;
        }
    };

    let now = ctx.now;
    let Ok(session) = ctx.me_mut() else {
        return Flow::Removed;
    };
    session.touch(now);

    match command {
        RegistrationCommand::Pass(password) => session.set_password(password),
        RegistrationCommand::Nick(nick) => session.set_nickname(nick.trim_nick().to_string()),
        RegistrationCommand::User { username, realname } => session.set_user(username, realname),
    }

    if session.flags().complete() {
        complete_registration(ctx)
    } else {
        Flow::Continue
    }
}

/// End-of-batch leniency for clients that never send USER.
pub fn finish_batch(ctx: &mut Context<'_>) -> Flow {
    let id = ctx.id;
    let Ok(session) = ctx.me_mut() else {
        return Flow::Removed;
    };
    if session.is_registered() || !session.flags().missing_only_user() {
        return Flow::Continue;
    }

    let nick = session.nickname.clone();
    debug!(session = %id, nick = %nick, "Synthesizing USER from nickname");
    session.set_user(nick.clone(), nick);
    complete_registration(ctx)
}

fn complete_registration(ctx: &mut Context<'_>) -> Flow {
    let Ok(session) = ctx.me() else {
        return Flow::Removed;
    };

    if session.password != ctx.server.password {
        warn!(
            session = %ctx.id,
            nick = %session.nickname,
            host = %session.hostname,
            "Password mismatch"
        );
        ctx.reply_error(&HandlerError::PasswordMismatch);
        remove_session(ctx.registry, ctx.id, Departure::Silent);
        return Flow::Removed;
    }

    let candidate = session.nickname.clone();
    let nick = resolve_nickname(ctx, &candidate);

    let Ok(session) = ctx.me_mut() else {
        return Flow::Removed;
    };
    session.nickname = nick.clone();
    session.mark_registered();
    ctx.registry.bind_nick(&nick, ctx.id);

    let Ok(session) = ctx.me() else {
        return Flow::Removed;
    };
    info!(
        session = %ctx.id,
        nick = %nick,
        user = %session.username,
        host = %session.hostname,
        "Client registered"
    );
    for line in welcome_burst(ctx.server_name(), session) {
        session.send(&line);
    }
    Flow::Continue
}
