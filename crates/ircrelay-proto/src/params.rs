//! Splitting a framed line into a command word and its parameters.
//!
//! Parameters are separated by spaces (or tabs). A parameter that starts
//! with `:` swallows the rest of the line, spaces included. A leading
//! `:source` token sent by a client is skipped.

/// Borrowed view over a framed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params<'a> {
    command: Option<&'a str>,
    args: Vec<&'a str>,
    trailing: bool,
}

#[inline]
fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

impl<'a> Params<'a> {
    /// Split `line` into command and parameters.
    pub fn parse(line: &'a str) -> Self {
        let mut rest = line.trim_start_matches(is_separator);

        if rest.starts_with(':') {
            rest = match rest.find(is_separator) {
                Some(end) => &rest[end..],
                None => "",
            };
        }

        let mut command = None;
        let mut args = Vec::new();
        let mut trailing = false;

        loop {
            rest = rest.trim_start_matches(is_separator);
            if rest.is_empty() {
                break;
            }

            if command.is_some() && rest.starts_with(':') {
                args.push(&rest[1..]);
                trailing = true;
                break;
            }

            let (token, tail) = match rest.find(is_separator) {
                Some(end) => (&rest[..end], &rest[end..]),
                None => (rest, ""),
            };
            rest = tail;

            if command.is_none() {
                command = Some(token);
            } else {
                args.push(token);
            }
        }

        Self {
            command,
            args,
            trailing,
        }
    }

    /// The command word, if the line was not blank.
    pub fn command(&self) -> Option<&'a str> {
        self.command
    }

    /// Parameter at `index` (0 is the first one after the command).
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// All parameters in order.
    pub fn args(&self) -> &[&'a str] {
        &self.args
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when the line carried no parameters.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// True when the last parameter was introduced with `:`.
    pub fn has_trailing(&self) -> bool {
        self.trailing
    }
}
