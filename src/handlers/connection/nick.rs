//! NICK handler and nickname collision resolution.

use ircrelay_proto::{NickExt, Params, encode};
use tracing::info;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};

/// Settle the nickname a session will actually get.
///
/// An invalid candidate is reported with 432 but still assigned. A
/// candidate held by another registered session is reported with 433 and
/// gets a single `_` appended. The suffixed name is not checked again.
pub fn resolve_nickname(ctx: &Context<'_>, candidate: &str) -> String {
    let mut nick = candidate.trim_nick().to_string();

    if !nick.is_valid_nick() {
        ctx.reply_error(&HandlerError::ErroneousNickname(nick.clone()));
    }

    if ctx.registry.nick_taken(&nick, ctx.id) {
        ctx.reply_error(&HandlerError::NicknameInUse(nick.clone()));
        nick.push('_');
    }

    nick
}

/// Handler for NICK command after registration.
///
/// The change is announced once to the user and once to every distinct
/// member of the channels they are in.
pub struct NickHandler;

impl PostRegHandler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let candidate = params
            .get(0)
            .map(str::trim_nick)
            .filter(|n| !n.is_empty())
            .ok_or(HandlerError::NoNicknameGiven)?;

        let old = ctx.nick()?;
        if candidate == old {
            return Ok(());
        }

        let new = resolve_nickname(ctx, candidate);
        if new == old {
            return Ok(());
        }

        // Announce under the old prefix, before the rename.
        let line = {
            let me = ctx.me()?;
            encode::user_line(&me.prefix(), &format!("NICK :{new}"))
        };
        ctx.reply(&line);
        for peer in ctx.registry.channel_peers(ctx.id) {
            ctx.registry.send_to(peer, &line);
        }

        ctx.registry.rename(ctx.id, &old, &new);
        info!(session = %ctx.id, old = %old, new = %new, "Nick changed");
        Ok(())
    }
}
