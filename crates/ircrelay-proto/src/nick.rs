//! Nickname validation.
//!
//! A nickname is 1 to 30 characters. The first character is an ASCII
//! letter or one of `[ ] \ ` _ ^ { }`; the rest may also use digits and
//! the hyphen.

/// Maximum nickname length.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

/// Extension trait for checking nickname syntax.
pub trait NickExt {
    /// Check if this string is a valid nickname.
    ///
    /// ```
    /// use ircrelay_proto::NickExt;
    ///
    /// assert!("bob".is_valid_nick());
    /// assert!("[away]".is_valid_nick());
    /// assert!(!"9lives".is_valid_nick());
    /// assert!(!"two words".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Check validity against a custom maximum length.
    fn is_valid_nick_len(&self, max_len: usize) -> bool;

    /// The candidate with surrounding whitespace and control characters removed.
    fn trim_nick(&self) -> &str;
}

#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '}')
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        self.is_valid_nick_len(DEFAULT_NICK_MAX_LEN)
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        if self.is_empty() || self.chars().count() > max_len {
            return false;
        }

        let mut chars = self.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };

        if !first.is_ascii_alphabetic() && !is_special(first) {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }

    fn trim_nick(&self) -> &str {
        self.trim_matches(|c: char| c.is_whitespace() || c.is_control())
    }
}
