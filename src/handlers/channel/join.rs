//! JOIN command handler.

use ircrelay_proto::{ChannelExt, Params, Response};
use tracing::info;

use super::common::ChannelTarget;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};
use crate::state::Channel;

/// Handler for JOIN command.
///
/// `JOIN #chan [key]`. The first joiner creates the channel, becomes its
/// operator, and fixes the channel's join password to the key it supplied.
pub struct JoinHandler;

impl PostRegHandler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        let target = params.get(0).ok_or(HandlerError::NeedMoreParams("JOIN"))?;
        let supplied = params.get(1).filter(|k| !k.is_empty());

        let name = target
            .channel_name()
            .filter(|name| name.is_valid_channel_name(ctx.limits.max_channel_name))
            .ok_or_else(|| HandlerError::NoSuchChannel(target.to_string()))?;

        let nick = ctx.nick()?;
        let key = match ctx.registry.channel_mut(name) {
            Some(channel) => {
                if channel.is_member(&nick) {
                    return Ok(());
                }
                channel
                    .admit(&nick, supplied)
                    .map_err(|e| HandlerError::channel(channel.display_name(), e))?;
                channel.add_member(&nick);
                name.channel_key()
            }
            None => {
                let mut channel = Channel::new(name, supplied.map(str::to_string));
                channel.add_member(&nick);
                channel.add_operator(&nick);
                ctx.registry.insert_channel(channel)
            }
        };
        ctx.me_mut()?.channels.insert(key.clone());

        let target = ChannelTarget::resolve(ctx, target)?;
        info!(session = %ctx.id, nick = %nick, channel = %target.display, "Joined channel");

        let line = ctx.user_line(&format!("JOIN {}", target.display))?;
        ctx.registry.broadcast(&target.key, &line, None);

        if let Some(topic) = target.get(ctx)?.topic() {
            ctx.numeric(Response::RPL_TOPIC, &format!("{} :{}", target.display, topic))?;
        }
        target.send_names_to_members(ctx)
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_first_join_creates_channel_with_op() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        h.send(alice, "JOIN #Rust\r\n");

        assert_eq!(
            ta.take(),
            vec![
                ":alice!alice@127.0.0.1 JOIN #Rust",
                ":ircserv 353 alice = #Rust :@alice",
                ":ircserv 366 alice #Rust :End of /NAMES list",
            ]
        );
        let chan = h.hub.registry().channel("#rust").unwrap();
        assert!(chan.is_operator("alice"));
        assert_eq!(chan.mode_string(), "+nt");
    }

    #[test]
    fn test_second_join_notifies_everyone() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\nTOPIC #rust :all things rust\r\n");
        ta.take();

        h.send(bob, "JOIN #RUST\r\n");

        assert_eq!(
            ta.take(),
            vec![
                ":bob!bob@127.0.0.1 JOIN #rust",
                ":ircserv 353 alice = #rust :@alice bob",
                ":ircserv 366 alice #rust :End of /NAMES list",
            ]
        );
        assert_eq!(
            tb.take(),
            vec![
                ":bob!bob@127.0.0.1 JOIN #rust",
                ":ircserv 332 bob #rust :all things rust",
                ":ircserv 353 bob = #rust :@alice bob",
                ":ircserv 366 bob #rust :End of /NAMES list",
            ]
        );
        assert!(h.hub.registry().session(bob).unwrap().channels.contains("rust"));
    }

    #[test]
    fn test_rejoin_is_silent() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        h.send(alice, "JOIN #rust\r\n");
        ta.take();
        h.send(alice, "JOIN #rust\r\n");
        assert!(ta.take().is_empty());
    }

    #[test]
    fn test_bad_targets() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        h.send(alice, "JOIN\r\nJOIN rust\r\nJOIN #\r\nJOIN #a,b\r\n");
        assert_eq!(
            ta.take(),
            vec![
                ":ircserv 461 alice :JOIN :Not enough parameters",
                ":ircserv 403 alice :rust :No such channel",
                ":ircserv 403 alice :# :No such channel",
                ":ircserv 403 alice :#a,b :No such channel",
            ]
        );

        let long = format!("JOIN #{}\r\n", "x".repeat(51));
        h.send(alice, &long);
        assert_eq!(ta.take().len(), 1);
        assert_eq!(h.hub.registry().channel_count(), 0);
    }

    #[test]
    fn test_join_password_from_creator() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #club letmein\r\n");

        h.send(bob, "JOIN #club\r\n");
        assert_eq!(tb.take(), vec![":ircserv 403 bob :#club :Cannot join channel"]);

        h.send(bob, "JOIN #club letmein\r\n");
        assert!(h.hub.registry().channel("#club").unwrap().is_member("bob"));
    }

    #[test]
    fn test_full_channel_rejects() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #tiny\r\nMODE #tiny +l 1\r\n");

        h.send(bob, "JOIN #tiny\r\n");
        assert_eq!(tb.take(), vec![":ircserv 471 bob :#tiny :Cannot join channel (+l)"]);
    }

    #[test]
    fn test_invite_only_and_key() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #vip\r\nMODE #vip +ik sesame\r\n");

        h.send(bob, "JOIN #vip\r\n");
        assert_eq!(tb.take(), vec![":ircserv 473 bob :#vip :Cannot join channel (+i)"]);

        h.send(alice, "INVITE bob #vip\r\n");
        tb.take();
        h.send(bob, "JOIN #vip wrong\r\n");
        assert_eq!(tb.take(), vec![":ircserv 475 bob :#vip :Cannot join channel (+k)"]);

        h.send(bob, "JOIN #vip sesame\r\n");
        let chan = h.hub.registry().channel("#vip").unwrap();
        assert!(chan.is_member("bob"));
        assert!(!chan.is_invited("bob"));
    }
}
