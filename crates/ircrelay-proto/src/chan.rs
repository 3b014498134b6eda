//! Channel name utilities.
//!
//! Channels are addressed on the wire as `#name`. Internally they are
//! stored without the sigil and looked up by their lowercase form.

/// Maximum length of a channel name, not counting the `#`.
pub const DEFAULT_CHANNEL_MAX_LEN: usize = 50;

/// Extension trait for channel targets.
pub trait ChannelExt {
    /// True if the target is addressed to a channel (starts with `#`).
    fn is_channel_target(&self) -> bool;

    /// Strip the `#` sigil, returning the bare name.
    fn channel_name(&self) -> Option<&str>;

    /// Validate a bare channel name against a maximum length.
    ///
    /// Names must be non-empty and must not contain space, comma, BEL,
    /// NUL, CR or LF.
    fn is_valid_channel_name(&self, max_len: usize) -> bool;

    /// Registry key for a bare channel name.
    fn channel_key(&self) -> String;
}

impl ChannelExt for str {
    fn is_channel_target(&self) -> bool {
        self.starts_with('#')
    }

    fn channel_name(&self) -> Option<&str> {
        self.strip_prefix('#')
    }

    fn is_valid_channel_name(&self, max_len: usize) -> bool {
        if self.is_empty() || self.len() > max_len {
            return false;
        }
        !self
            .chars()
            .any(|c| matches!(c, ' ' | ',' | '\x07' | '\0' | '\r' | '\n'))
    }

    fn channel_key(&self) -> String {
        self.to_ascii_lowercase()
    }
}
