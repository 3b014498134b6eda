//! KICK command handler.

use ircrelay_proto::Params;
use tracing::info;

use super::common::ChannelTarget;
use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};

const DEFAULT_REASON: &str = "Kicked";

/// Handler for KICK command.
///
/// `KICK #chan nick [:reason]`. Only removes the membership; the kicked
/// session stays connected.
pub struct KickHandler;

impl PostRegHandler for KickHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let (Some(name), Some(victim)) = (params.get(0), params.get(1)) else {
            return Err(HandlerError::NeedMoreParams("KICK"));
        };
        let reason = params
            .get(2)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REASON);

        let target = ChannelTarget::resolve(ctx, name)?;
        let nick = ctx.nick()?;
        let channel = target.get(ctx)?;
        channel
            .require_operator(&nick)
            .map_err(|e| target.error(e))?;

        let victim_id = ctx
            .registry
            .find_nick(victim)
            .ok_or_else(|| HandlerError::NoSuchNick(victim.to_string()))?;
        if !channel.is_member(victim) {
            return Err(target.error(ChannelError::UserNotInChannel(victim.to_string())));
        }

        let line =
            ctx.user_line(&format!("KICK {} {} :{}", target.display, victim, reason))?;
        ctx.registry.broadcast(&target.key, &line, None);
        ctx.registry.part_channel(victim_id, &target.key);

        info!(
            session = %ctx.id,
            nick = %nick,
            channel = %target.display,
            victim = %victim,
            reason,
            "Kicked user"
        );
        Ok(())
    }
}
