//! MODE command handler.
//!
//! Channel modes only: `MODE #chan` reports the current modes, and
//! `MODE #chan <modestring> [params...]` applies changes. Every applied
//! change is collected into one summary and announced in a single line.
//! A MODE aimed at a nickname is answered with 472.

use ircrelay_proto::{
    ChannelExt, ModeChange, ModeKind, ModeSummary, Params, Response, parse_mode_changes,
};
use tracing::{debug, info};

use super::channel::ChannelTarget;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};
use crate::state::Channel;

/// Handler for MODE command.
pub struct ModeHandler;

impl PostRegHandler for ModeHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let name = params.get(0).ok_or(HandlerError::NeedMoreParams("MODE"))?;
        if !name.is_channel_target() {
            return Err(HandlerError::UserModesUnsupported(name.to_string()));
        }

        let target = ChannelTarget::resolve(ctx, name)?;
        let nick = ctx.nick()?;

        let Some(modestring) = params.get(1) else {
            let channel = target.get(ctx)?;
            channel.require_member(&nick).map_err(|e| target.error(e))?;
            let modes = channel.mode_string();
            return ctx.numeric(
                Response::RPL_CHANNELMODEIS,
                &format!("{} {}", target.display, modes),
            );
        };

        target
            .get(ctx)?
            .require_operator(&nick)
            .map_err(|e| target.error(e))?;

        let id = ctx.id;
        let args = params.args().get(2..).unwrap_or_default();
        let channel = target.get_mut(ctx)?;
        let mut summary = ModeSummary::new();
        for result in parse_mode_changes(modestring, args) {
            match result {
                Ok(change) => {
                    if apply_change(channel, &change) {
                        summary.push(&change);
                    }
                }
                Err(error) => {
                    debug!(session = %id, channel = %target.display, %error, "Skipping mode flag");
                }
            }
        }

        if summary.is_empty() {
            return Ok(());
        }

        let line = ctx.user_line(&format!("MODE {} {}", target.display, summary))?;
        ctx.registry.broadcast(&target.key, &line, None);
        info!(
            session = %id,
            nick = %nick,
            channel = %target.display,
            modes = %summary,
            "Channel modes changed"
        );
        Ok(())
    }
}

/// Apply one parsed change. Returns false when it had no effect worth
/// announcing (operator changes for non-members).
fn apply_change(channel: &mut Channel, change: &ModeChange) -> bool {
    match change.kind {
        ModeKind::Flag(mode) => {
            channel.set_flag(mode, change.adding);
            true
        }
        ModeKind::Key => {
            let key = if change.adding { change.param.clone() } else { None };
            channel.set_key(key);
            true
        }
        ModeKind::Limit => {
            if !change.adding {
                channel.set_limit(None);
                return true;
            }
            match change.param.as_deref().and_then(|p| p.parse().ok()) {
                Some(limit) => {
                    channel.set_limit(Some(limit));
                    true
                }
                None => false,
            }
        }
        ModeKind::Oper => {
            let Some(nick) = change.param.as_deref() else {
                return false;
            };
            if change.adding {
                channel.add_operator(nick)
            } else {
                channel.remove_operator(nick)
            }
        }
    }
}
