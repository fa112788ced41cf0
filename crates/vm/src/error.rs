//! Runtime errors for the simpl VM.
//!
//! Every error raised while executing carries the index of the offending
//! instruction (`at`). Execution stops at the first error; output already
//! written stays written.

use thiserror::Error;

/// Errors that occur while loading or executing a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The program has no `func_start main`. Raised before anything runs.
    #[error("no 'main' function to start from")]
    MissingEntryPoint,

    /// Two `label` instructions share a name.
    #[error("label '{label}' defined twice (again at instruction {at})")]
    DuplicateLabel { at: usize, label: String },

    /// Two `func_start` instructions share a name.
    #[error("function '{name}' defined twice (again at instruction {at})")]
    DuplicateFunction { at: usize, name: String },

    /// A name was read that the current frame does not bind.
    #[error("undefined variable '{name}' at instruction {at}")]
    UndefinedSymbol { at: usize, name: String },

    #[error("jump to undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: usize, label: String },

    #[error("call to undefined function '{name}' at instruction {at}")]
    UndefinedFunction { at: usize, name: String },

    /// The call site's argument count disagrees with the callee's parameter
    /// list, or too few arguments are pending.
    #[error("function '{function}' expects {expected} argument(s), got {found} at instruction {at}")]
    ArityMismatch {
        at: usize,
        function: String,
        expected: usize,
        found: usize,
    },

    /// An operand has the wrong runtime type for the opcode.
    #[error("'{op}' expects {expected}, found {found} at instruction {at}")]
    TypeMismatch {
        at: usize,
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// `ret` or `func_end` with no frame to leave.
    #[error("no frame to return from at instruction {at}")]
    StackUnderflow { at: usize },

    /// `retval` read when no value was returned since the last call.
    #[error("no return value available at instruction {at}")]
    MissingReturnValue { at: usize },

    #[error("call depth exceeded limit {limit} at instruction {at}")]
    CallDepthExceeded { at: usize, limit: usize },

    #[error("step limit {limit} exceeded at instruction {at}")]
    StepLimitExceeded { at: usize, limit: u64 },

    /// A field holds an operand the opcode cannot use, such as a literal
    /// destination or a missing source.
    #[error("invalid operand {operand} at instruction {at}")]
    InvalidOperand { at: usize, operand: String },

    /// Writing to the output sink failed.
    #[error("output error at instruction {at}: {message}")]
    Output { at: usize, message: String },
}
