//! Messaging handlers.
//!
//! Handles PRIVMSG and NOTICE commands for both users and channels. The
//! two share one relay path and differ only in the keyword they echo.

use ircrelay_proto::{ChannelExt, Params};
use tracing::debug;

use super::channel::ChannelTarget;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};

/// Handler for PRIVMSG command.
pub struct PrivmsgHandler;

/// Handler for NOTICE command.
pub struct NoticeHandler;

impl PostRegHandler for PrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        relay(ctx, params, "PRIVMSG")
    }
}

impl PostRegHandler for NoticeHandler {
    fn handle(&self, ctx: &mut Context<'_>, params: &Params<'_>) -> HandlerResult {
        relay(ctx, params, "NOTICE")
    }
}

/// Deliver `<command> target :text`.
///
/// Channel delivery reaches every member except the sender and is gated
/// by `+n` and `+m`. Direct delivery only needs the nickname to exist.
fn relay(ctx: &mut Context<'_>, params: &Params<'_>, command: &'static str) -> HandlerResult {
    let target = params
        .get(0)
        .filter(|t| !t.is_empty())
        .ok_or(HandlerError::NoRecipient(command))?;
    // Without a `:` the words after the target are rejoined.
    let text = params.args().get(1..).unwrap_or_default().join(" ");
    if text.is_empty() {
        return Err(HandlerError::NoTextToSend);
    }

    let nick = ctx.nick()?;

    if target.is_channel_target() {
        let channel = ChannelTarget::resolve(ctx, target)?;
        channel
            .get(ctx)?
            .can_speak(&nick)
            .map_err(|e| channel.error(e))?;

        let line = ctx.user_line(&format!("{} {} :{}", command, channel.display, text))?;
        ctx.registry.broadcast(&channel.key, &line, Some(nick.as_str()));
        debug!(session = %ctx.id, channel = %channel.display, command, "Relayed to channel");
    } else {
        let recipient = ctx
            .registry
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.to_string()))?;

        let line = ctx.user_line(&format!("{} {} :{}", command, target, text))?;
        ctx.registry.send_to(recipient, &line);
        debug!(session = %ctx.id, target = %target, command, "Relayed to user");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_channel_fan_out_excludes_sender() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        let (carol, tc) = h.register("carol");
        for id in [alice, bob, carol] {
            h.send(id, "JOIN #rust\r\n");
        }
        h.drain_all(&[&ta, &tb, &tc]);

        h.send(alice, "PRIVMSG #rust :hello all\r\n");
        assert!(ta.take().is_empty());
        let expected = ":alice!alice@127.0.0.1 PRIVMSG #rust :hello all";
        assert_eq!(tb.take(), vec![expected]);
        assert_eq!(tc.take(), vec![expected]);
    }

    #[test]
    fn test_direct_message_and_notice() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (_bob, tb) = h.register("bob");

        h.send(alice, "PRIVMSG bob :hi bob\r\nNOTICE bob psst\r\n");
        assert!(ta.take().is_empty());
        assert_eq!(
            tb.take(),
            vec![
                ":alice!alice@127.0.0.1 PRIVMSG bob :hi bob",
                ":alice!alice@127.0.0.1 NOTICE bob :psst",
            ]
        );
    }

    #[test]
    fn test_text_without_colon_keeps_every_word() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(bob, "JOIN #rust\r\n");
        h.send(alice, "JOIN #rust\r\n");
        tb.take();

        h.send(alice, "PRIVMSG bob hello there world\r\nNOTICE #rust two words\r\n");
        assert_eq!(
            tb.take(),
            vec![
                ":alice!alice@127.0.0.1 PRIVMSG bob :hello there world",
                ":alice!alice@127.0.0.1 NOTICE #rust :two words",
            ]
        );
    }

    #[test]
    fn test_relay_errors() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");

        h.send(
            alice,
            "PRIVMSG\r\nNOTICE\r\nPRIVMSG bob\r\nPRIVMSG bob :\r\n\
             PRIVMSG ghost :hi\r\nPRIVMSG #void :hi\r\n",
        );
        assert_eq!(
            ta.take(),
            vec![
                ":ircserv 411 alice :No recipient given (PRIVMSG)",
                ":ircserv 411 alice :No recipient given (NOTICE)",
                ":ircserv 412 alice :No text to send",
                ":ircserv 412 alice :No text to send",
                ":ircserv 401 alice :ghost :No such nick/channel",
                ":ircserv 403 alice :#void :No such channel",
            ]
        );
    }

    #[test]
    fn test_no_external_messages() {
        let mut h = Harness::new();
        let (alice, _ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");

        h.send(bob, "PRIVMSG #rust :let me in\r\n");
        assert_eq!(tb.take(), vec![":ircserv 404 bob :#rust :Cannot send to channel"]);

        h.send(alice, "MODE #rust -n\r\n");
        h.send(bob, "PRIVMSG #rust :from outside\r\n");
        assert!(tb.take().is_empty());
    }

    #[test]
    fn test_moderated_channel() {
        let mut h = Harness::new();
        let (alice, ta) = h.register("alice");
        let (bob, tb) = h.register("bob");
        h.send(alice, "JOIN #rust\r\n");
        h.send(bob, "JOIN #rust\r\n");
        h.send(alice, "MODE #rust +m\r\n");
        h.drain_all(&[&ta, &tb]);

        h.send(bob, "PRIVMSG #rust :can I speak?\r\n");
        assert_eq!(tb.take(), vec![":ircserv 404 bob :#rust :Cannot send to channel"]);
        assert!(ta.take().is_empty());

        h.send(alice, "PRIVMSG #rust :ops only\r\n");
        assert_eq!(tb.take(), vec![":alice!alice@127.0.0.1 PRIVMSG #rust :ops only"]);
    }
}
