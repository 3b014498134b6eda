//! # ircrelay-proto
//!
//! Wire-level building blocks for the `ircrelay` daemon.
//!
//! ## Features
//!
//! - Per-connection line framing with a bounded reassembly buffer
//! - Numeric reply codes and the two reply encoders (error form and plain form)
//! - Nickname and channel-name validation
//! - Command classification and parameter splitting
//! - Channel mode table and combined change summaries
//!
//! ## Quick Start
//!
//! ```rust
//! use ircrelay_proto::{LineFramer, Params, Response, encode};
//!
//! let mut framer = LineFramer::new();
//! framer.feed(b"PRIVMSG bob :hello there\r\n");
//!
//! let line = framer.next_message().expect("complete line");
//! let params = Params::parse(&line);
//! assert_eq!(params.command(), Some("PRIVMSG"));
//! assert_eq!(params.get(1), Some("hello there"));
//!
//! let reply = encode::error_reply(
//!     "ircserv",
//!     Response::ERR_NOSUCHNICK,
//!     "alice",
//!     "bob :No such nick/channel",
//! );
//! assert_eq!(reply, ":ircserv 401 alice :bob :No such nick/channel\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod command;
pub mod encode;
pub mod error;
pub mod line;
pub mod mode;
pub mod nick;
pub mod params;
pub mod response;

pub use self::chan::{ChannelExt, DEFAULT_CHANNEL_MAX_LEN};
pub use self::command::{CommandCode, RegistrationCommand};
pub use self::encode::UserPrefix;
pub use self::error::{ProtocolError, Result};
pub use self::line::{FeedOutcome, LineFramer, DEFAULT_MAX_BUFFER};
pub use self::mode::{parse_mode_changes, ChannelMode, ModeChange, ModeKind, ModeSummary};
pub use self::nick::{NickExt, DEFAULT_NICK_MAX_LEN};
pub use self::params::Params;
pub use self::response::Response;
