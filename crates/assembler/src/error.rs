//! Error types for the simpl assembler.

use simpl_common::TextError;
use thiserror::Error;

/// Errors produced while assembling text into a program.
///
/// Every variant carries the 1-based source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first token on a line is not an opcode mnemonic.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode did not have enough operands.
    #[error("line {line}: {opcode} expects {expected} operand(s)")]
    MissingArgument {
        line: usize,
        opcode: &'static str,
        expected: usize,
    },

    /// More operands than the opcode takes.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// An operand token that is not a literal, `retval` or a name.
    #[error("line {line}: {source}")]
    InvalidOperand {
        line: usize,
        #[source]
        source: TextError,
    },

    /// A string literal runs to the end of the line.
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
}

impl AsmError {
    /// The 1-based line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownOpcode { line, .. }
            | AsmError::MissingArgument { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::InvalidOperand { line, .. }
            | AsmError::UnterminatedString { line } => *line,
        }
    }
}
