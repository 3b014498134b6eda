//! INVITE command handler.

use ircrelay_proto::{ChannelMode, Params, Response};
use tracing::info;

use super::common::ChannelTarget;
use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};

/// Handler for INVITE command.
///
/// `INVITE nick #chan`. Any member may invite unless the channel is
/// invite-only, in which case only operators can.
pub struct InviteHandler;

impl PostRegHandler for InviteHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let (Some(invitee), Some(name)) = (params.get(0), params.get(1)) else {
            return Err(HandlerError::NeedMoreParams("INVITE"));
        };

        let target = ChannelTarget::resolve(ctx, name)?;
        let nick = ctx.nick()?;
        let channel = target.get(ctx)?;
        channel.require_member(&nick).map_err(|e| target.error(e))?;
        if channel.has_mode(ChannelMode::InviteOnly) {
            channel.require_operator(&nick).map_err(|e| target.error(e))?;
        }

        let invitee_id = ctx
            .registry
            .find_nick(invitee)
            .ok_or_else(|| HandlerError::NoSuchNick(invitee.to_string()))?;
        if channel.is_member(invitee) {
            return Err(target.error(ChannelError::UserOnChannel(invitee.to_string())));
        }

        target.get_mut(ctx)?.invite(invitee);

        let line = ctx.user_line(&format!("INVITE {} {}", invitee, target.display))?;
        ctx.registry.send_to(invitee_id, &line);
        ctx.numeric(Response::RPL_INVITING, &format!("{} {}", invitee, target.display))?;

        info!(
            session = %ctx.id,
            nick = %nick,
            channel = %target.display,
            invitee = %invitee,
            "Invited user"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_invite_notifies_both_sides() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (_bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");
        ta.take();

        h.send(alice, "INVITE bob #rust\r\n");
        assert_eq!(ta.take(), vec![":ircserv 341 alice bob #rust"]);
        assert_eq!(tb.take(), vec![":alice!alice@127.0.0.1 INVITE bob #rust"]);
        assert!(h.hub.registry().channel("#rust").unwrap().is_invited("bob"));
    }

    #[test]
    fn test_invite_only_requires_operator() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        let (_carol, _tc) = h.register("carol");
        h.send(alice, "JOIN #rust\r\n");
        h.send(bob, "JOIN #rust\r\n");
        h.send(alice, "MODE #rust +i\r\n");
        tb.take();

        h.send(bob, "INVITE carol #rust\r\n");
        assert_eq!(tb.take(), vec![":ircserv 482 bob :#rust :You're not channel operator"]);
    }

    #[test]
    fn test_invite_errors() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, _tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");
        h.send(bob, "JOIN #rust\r\n");
        ta.take();

        h.send(
            alice,
            "INVITE bob\r\nINVITE bob #gone\r\nINVITE ghost #rust\r\nINVITE bob #rust\r\n",
        );
        assert_eq!(
            ta.take(),
            vec![
                ":ircserv 461 alice :INVITE :Not enough parameters",
                ":ircserv 403 alice :#gone :No such channel",
                ":ircserv 401 alice :ghost :No such nick/channel",
                ":ircserv 443 alice :bob #rust :is already on channel",
            ]
        );
    }
}
