//! Shared lookups for channel command handlers.

use ircrelay_proto::{ChannelExt, Response, encode};

use crate::error::{ChannelError, HandlerError};
use crate::handlers::Context;
use crate::state::Channel;

/// An existing channel named by a command parameter.
#[derive(Debug, Clone)]
pub(crate) struct ChannelTarget {
    /// Registry key.
    pub key: String,
    /// `#name` as the channel was created.
    pub display: String,
}

impl ChannelTarget {
    /// Resolve a `#name` parameter, or fail with 403 naming it as given.
    pub fn resolve(ctx: &Context<'_>, target: &str) -> Result<Self, HandlerError> {
        let channel = target
            .channel_name()
            .and_then(|name| ctx.registry.channel(name))
            .ok_or_else(|| HandlerError::NoSuchChannel(target.to_string()))?;
        Ok(Self {
            key: channel.name().channel_key(),
            display: channel.display_name(),
        })
    }

    pub fn get<'c>(&self, ctx: &'c Context<'_>) -> Result<&'c Channel, HandlerError> {
        ctx.registry
            .channel(&self.key)
            .ok_or_else(|| HandlerError::NoSuchChannel(self.display.clone()))
    }

    pub fn get_mut<'c>(&self, ctx: &'c mut Context<'_>) -> Result<&'c mut Channel, HandlerError> {
        ctx.registry
            .channel_mut(&self.key)
            .ok_or_else(|| HandlerError::NoSuchChannel(self.display.clone()))
    }

    /// Attach this channel's name to a predicate failure.
    pub fn error(&self, source: ChannelError) -> HandlerError {
        HandlerError::channel(&self.display, source)
    }

    /// Send 353 and 366 to every member, each addressed by their own nick.
    pub fn send_names_to_members(&self, ctx: &Context<'_>) -> Result<(), HandlerError> {
        let channel = self.get(ctx)?;
        let names = format!("= {} :{}", self.display, channel.names());
        let end = format!("{} :End of /NAMES list", self.display);

        for nick in channel.members() {
            let Some(id) = ctx.registry.find_nick(nick) else {
                continue;
            };
            ctx.registry.send_to(
                id,
                &encode::numeric_reply(ctx.server_name(), Response::RPL_NAMREPLY, nick, &names),
            );
            ctx.registry.send_to(
                id,
                &encode::numeric_reply(ctx.server_name(), Response::RPL_ENDOFNAMES, nick, &end),
            );
        }
        Ok(())
    }
}
