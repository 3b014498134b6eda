//! TOPIC command handler.

use ircrelay_proto::{Params, Response};
use tracing::info;

use super::common::ChannelTarget;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};

/// Handler for TOPIC command.
///
/// Without a second parameter the topic is reported to the requester.
/// With one, the topic is replaced and announced to every member.
pub struct TopicHandler;

impl PostRegHandler for TopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let name = params.get(0).ok_or(HandlerError::NeedMoreParams("TOPIC"))?;
        let target = ChannelTarget::resolve(ctx, name)?;

        let Some(topic) = params.get(1) else {
            return match target.get(ctx)?.topic() {
                Some(topic) => {
                    ctx.numeric(Response::RPL_TOPIC, &format!("{} :{}", target.display, topic))
                }
                None => ctx.numeric(
                    Response::RPL_NOTOPIC,
                    &format!("{} :No topic is set", target.display),
                ),
            };
        };

        let nick = ctx.nick()?;
        let channel = target.get_mut(ctx)?;
        channel.can_set_topic(&nick).map_err(|e| target.error(e))?;
        channel.set_topic(topic);

        let line = ctx.user_line(&format!("TOPIC {} :{}", target.display, topic))?;
        ctx.registry.broadcast(&target.key, &line, None);
        info!(session = %ctx.id, nick = %nick, channel = %target.display, "Topic changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_topic_set_and_view() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");
        h.send(bob, "JOIN #rust\r\n");
        h.drain_all(&[&ta, &tb]);

        h.send(bob, "TOPIC #rust\r\n");
        assert_eq!(tb.take(), vec![":ircserv 331 bob #rust :No topic is set"]);

        h.send(alice, "TOPIC #rust :fearless concurrency\r\n");
        let expected = ":alice!alice@127.0.0.1 TOPIC #rust :fearless concurrency";
        assert_eq!(ta.take(), vec![expected]);
        assert_eq!(tb.take(), vec![expected]);

        h.send(bob, "TOPIC #rust\r\n");
        assert_eq!(tb.take(), vec![":ircserv 332 bob #rust :fearless concurrency"]);
    }

    #[test]
    fn test_topic_lock() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");
        h.send(bob, "JOIN #rust\r\n");
        tb.take();

        h.send(bob, "TOPIC #rust :mine now\r\n");
        assert_eq!(tb.take(), vec![":ircserv 482 bob :#rust :You're not channel operator"]);

        h.send(alice, "MODE #rust -t\r\n");
        tb.take();
        h.send(bob, "TOPIC #rust :mine now\r\n");
        assert_eq!(tb.take(), vec![":bob!bob@127.0.0.1 TOPIC #rust :mine now"]);
    }

    #[test]
    fn test_topic_requires_membership_to_set_only() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (carol, tc) = h.register("carol");
        h.send(alice, "JOIN #rust\r\nTOPIC #rust :hello\r\n");

        h.send(carol, "TOPIC #rust\r\nTOPIC #rust :hijack\r\nTOPIC\r\n");
        assert_eq!(
            tc.take(),
            vec![
                ":ircserv 332 carol #rust :hello",
                ":ircserv 442 carol :#rust :You're not on that channel",
                ":ircserv 461 carol :TOPIC :Not enough parameters",
            ]
        );
    }
}
