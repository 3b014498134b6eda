//! Welcome burst sent once registration completes.

use ircrelay_proto::{Response, encode};

use crate::state::Session;

const BANNER: &[&str] = &[
    "Commands available on this server:",
    "  JOIN #channel [key]",
    "  PART #channel [:reason]",
    "  PRIVMSG <nick|#channel> :text",
    "  NOTICE <nick|#channel> :text",
    "  NICK newnick",
    "  TOPIC #channel [:topic]",
    "  INVITE nick #channel",
    "  KICK #channel nick [:reason]",
    "  MODE #channel [+|-]itnspmklo [params]",
    "  QUIT [:reason]",
];

/// Lines of the burst, each framed as 001.
pub(super) fn welcome_burst(server: &str, session: &Session) -> Vec<String> {
    let nick = &session.nickname;
    let greeting = format!(":Welcome to {server}, {}", session.prefix());
    std::iter::once(greeting)
        .chain(BANNER.iter().map(|line| format!(":{line}")))
        .map(|text| encode::numeric_reply(server, Response::RPL_WELCOME, nick, &text))
        .collect()
}
