//! Error types for the wire layer.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Malformed input detected while interpreting a framed line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// A command arrived without its required parameters.
    #[error("{0}: not enough parameters")]
    NeedMoreParams(&'static str),

    /// A mode character outside the channel mode table.
    #[error("unknown mode flag '{0}'")]
    UnknownMode(char),

    /// A parameterised mode arrived without its parameter.
    #[error("mode '{0}' requires a parameter")]
    MissingModeParam(char),

    /// A mode parameter failed validation.
    #[error("invalid parameter for mode '{flag}': {param:?}")]
    InvalidModeParam {
        /// The mode character.
        flag: char,
        /// The rejected parameter.
        param: String,
    },
}
