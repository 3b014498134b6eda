//! PART command handler.

use ircrelay_proto::Params;
use tracing::info;

use super::common::ChannelTarget;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};

/// Handler for PART command.
///
/// The PART line goes to every member, the parting user included, before
/// the membership is dropped. The last member out destroys the channel.
pub struct PartHandler;

impl PostRegHandler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let name = params.get(0).ok_or(HandlerError::NeedMoreParams("PART"))?;
        let target = ChannelTarget::resolve(ctx, name)?;
        let nick = ctx.nick()?;
        target
            .get(ctx)?
            .require_member(&nick)
            .map_err(|e| target.error(e))?;

        let body = match params.get(1).filter(|r| !r.is_empty()) {
            Some(reason) => format!("PART {} :{}", target.display, reason),
            None => format!("PART {}", target.display),
        };
        let line = ctx.user_line(&body)?;
        ctx.registry.broadcast(&target.key, &line, None);
        ctx.registry.part_channel(ctx.id, &target.key);

        info!(session = %ctx.id, nick = %nick, channel = %target.display, "Left channel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_part_echoes_to_all_and_leaves() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");
        h.send(bob, "JOIN #rust\r\n");
        h.drain_all(&[&ta, &tb]);

        h.send(bob, "PART #rust :see you\r\n");
        let expected = ":bob!bob@127.0.0.1 PART #rust :see you";
        assert_eq!(ta.take(), vec![expected]);
        assert_eq!(tb.take(), vec![expected]);

        let registry = h.hub.registry();
        assert!(!registry.channel("#rust").unwrap().is_member("bob"));
        assert!(registry.session(bob).unwrap().channels.is_empty());
    }

    #[test]
    fn test_last_part_destroys_channel() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        h.send(alice, "JOIN #rust\r\n");
        ta.take();

        h.send(alice, "PART #rust\r\n");
        assert_eq!(ta.take(), vec![":alice!alice@127.0.0.1 PART #rust"]);
        assert!(h.hub.registry().channel("#rust").is_none());

        // Rejoining recreates it with the joiner as operator.
        h.send(alice, "JOIN #rust\r\n");
        assert!(h.hub.registry().channel("#rust").unwrap().is_operator("alice"));
    }

    #[test]
    fn test_part_errors() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, _tb) = h.register("bob");
        h.send(bob, "JOIN #rust\r\n");

        h.send(alice, "PART\r\nPART #nowhere\r\nPART #rust\r\n");
        assert_eq!(
            ta.take(),
            vec![
                ":ircserv 461 alice :PART :Not enough parameters",
                ":ircserv 403 alice :#nowhere :No such channel",
                ":ircserv 442 alice :#rust :You're not on that channel",
            ]
        );
    }
}
