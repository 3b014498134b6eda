//! Connection lifecycle: handshake, nickname changes and removal.

mod nick;
mod quit;
mod registration;
mod welcome;

pub use nick::{NickHandler, resolve_nickname};
pub use quit::{Departure, QuitHandler, remove_session};
pub use registration::{finish_batch, handle_registration_line};
