//! Channel modes.
//!
//! Mode strings are interpreted with a fixed table: each flag states
//! whether it consumes a parameter when set and when cleared, and how that
//! parameter is validated. Parameters are consumed strictly left to right
//! as the table demands, so `+kl secret 10` pairs `k` with `secret` and
//! `l` with `10`.

use std::fmt;

use crate::error::ProtocolError;

/// Boolean and parameterised channel mode flags.
///
/// Declaration order follows the flag letter so that ordered sets of
/// modes render alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelMode {
    /// 'i' - join requires an invitation
    InviteOnly,
    /// 'k' - join requires the channel key
    Key,
    /// 'l' - member count is capped
    Limit,
    /// 'm' - only operators may speak
    Moderated,
    /// 'n' - only members may speak
    NoExternal,
    /// 'p' - private
    Private,
    /// 's' - secret
    Secret,
    /// 't' - only operators may change the topic
    TopicLock,
}

impl ChannelMode {
    /// Mode letter.
    pub fn as_char(&self) -> char {
        match self {
            Self::InviteOnly => 'i',
            Self::Key => 'k',
            Self::Limit => 'l',
            Self::Moderated => 'm',
            Self::NoExternal => 'n',
            Self::Private => 'p',
            Self::Secret => 's',
            Self::TopicLock => 't',
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// What a table entry does when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// Toggle a parameterless flag.
    Flag(ChannelMode),
    /// Set or clear the channel key.
    Key,
    /// Set or clear the member limit.
    Limit,
    /// Grant or revoke operator status.
    Oper,
}

/// One row of the mode table.
#[derive(Debug, Clone, Copy)]
pub struct ModeSpec {
    /// Mode letter.
    pub flag: char,
    /// Effect.
    pub kind: ModeKind,
    /// Consumes a parameter on `+`.
    pub param_on_set: bool,
    /// Consumes a parameter on `-`.
    pub param_on_clear: bool,
    /// Accepts or rejects a consumed parameter.
    pub validator: fn(&str) -> bool,
}

fn any_param(_: &str) -> bool {
    true
}

fn non_empty(param: &str) -> bool {
    !param.is_empty()
}

fn positive_integer(param: &str) -> bool {
    param.parse::<usize>().is_ok_and(|n| n > 0)
}

impl ModeSpec {
    const fn toggle(flag: char, mode: ChannelMode) -> Self {
        Self {
            flag,
            kind: ModeKind::Flag(mode),
            param_on_set: false,
            param_on_clear: false,
            validator: any_param,
        }
    }

    const fn with_param(
        flag: char,
        kind: ModeKind,
        param_on_clear: bool,
        validator: fn(&str) -> bool,
    ) -> Self {
        Self {
            flag,
            kind,
            param_on_set: true,
            param_on_clear,
            validator,
        }
    }
}

/// The recognised channel modes.
pub const MODE_TABLE: &[ModeSpec] = &[
    ModeSpec::toggle('i', ChannelMode::InviteOnly),
    ModeSpec::toggle('t', ChannelMode::TopicLock),
    ModeSpec::toggle('n', ChannelMode::NoExternal),
    ModeSpec::toggle('s', ChannelMode::Secret),
    ModeSpec::toggle('p', ChannelMode::Private),
    ModeSpec::toggle('m', ChannelMode::Moderated),
    ModeSpec::with_param('k', ModeKind::Key, false, non_empty),
    ModeSpec::with_param('l', ModeKind::Limit, false, positive_integer),
    ModeSpec::with_param('o', ModeKind::Oper, true, non_empty),
];

/// Look up a mode letter in [`MODE_TABLE`].
pub fn lookup(flag: char) -> Option<&'static ModeSpec> {
    MODE_TABLE.iter().find(|entry| entry.flag == flag)
}

/// A single well-formed change extracted from a mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    /// `+` when true, `-` when false.
    pub adding: bool,
    /// Flag letter.
    pub flag: char,
    /// Effect.
    pub kind: ModeKind,
    /// Consumed parameter, if the table asked for one.
    pub param: Option<String>,
}

/// Scan a mode string against [`MODE_TABLE`].
///
/// Every flag yields one entry: the change, or the reason it was
/// rejected. Unknown flags never consume a parameter. A known flag whose
/// parameter fails validation still consumes it.
pub fn parse_mode_changes(
    modestring: &str,
    params: &[&str],
) -> Vec<Result<ModeChange, ProtocolError>> {
    let mut params = params.iter();
    let mut adding = true;
    let mut out = Vec::new();

    for flag in modestring.chars() {
        match flag {
            '+' => adding = true,
            '-' => adding = false,
            _ => {
                let Some(entry) = lookup(flag) else {
                    out.push(Err(ProtocolError::UnknownMode(flag)));
                    continue;
                };

                let wants_param = if adding {
                    entry.param_on_set
                } else {
                    entry.param_on_clear
                };

                let param = if wants_param {
                    match params.next() {
                        Some(param) if (entry.validator)(param) => Some(param.to_string()),
                        Some(param) => {
                            out.push(Err(ProtocolError::InvalidModeParam {
                                flag,
                                param: param.to_string(),
                            }));
                            continue;
                        }
                        None => {
                            out.push(Err(ProtocolError::MissingModeParam(flag)));
                            continue;
                        }
                    }
                } else {
                    None
                };

                out.push(Ok(ModeChange {
                    adding,
                    flag,
                    kind: entry.kind,
                    param,
                }));
            }
        }
    }

    out
}

/// Accumulates applied changes into one broadcastable mode string.
///
/// A sign is written only when it differs from the previous one, so
/// `+k`, `+l` become `+kl`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSummary {
    flags: String,
    params: Vec<String>,
    sign: Option<bool>,
}

impl ModeSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied change.
    pub fn push(&mut self, change: &ModeChange) {
        if self.sign != Some(change.adding) {
            self.flags.push(if change.adding { '+' } else { '-' });
            self.sign = Some(change.adding);
        }
        self.flags.push(change.flag);
        if let Some(param) = &change.param {
            self.params.push(param.clone());
        }
    }

    /// True when nothing was applied.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl fmt::Display for ModeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flags)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}
