//! Errors for reading three-address code from its textual form.

use thiserror::Error;

/// Errors that occur when parsing an opcode mnemonic or an operand token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// Mnemonic is not one of the 27 opcodes. Mnemonics are case-sensitive.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// Numeric literal does not fit in a signed 64-bit integer.
    #[error("integer literal out of range: {0}")]
    IntegerOutOfRange(String),

    /// String literal has an opening quote but no closing one.
    #[error("unterminated string literal: {0}")]
    UnterminatedString(String),

    /// Backslash escape other than `\\`, `\"`, `\n` or `\t`.
    #[error("invalid escape '\\{escape}' in string literal {token}")]
    InvalidEscape { token: String, escape: char },

    /// Token is neither a literal, `retval`, nor a valid name.
    #[error("invalid operand '{0}'")]
    InvalidOperand(String),
}
