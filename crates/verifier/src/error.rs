//! Verification errors for simpl three-address code.
//!
//! Every error tied to an instruction includes its index (`at`). The verifier
//! collects all errors, not just the first.

use simpl_common::Opcode;
use thiserror::Error;

/// Errors found during static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Structural ---
    /// `func_start` with no `func_end` before the end of the program.
    #[error("function '{name}' starting at instruction {at} is never closed")]
    UnclosedFunction { at: usize, name: String },

    /// `func_end` with no open function.
    #[error("func_end '{name}' at instruction {at} has no matching func_start")]
    UnmatchedFuncEnd { at: usize, name: String },

    /// `func_end` names a different function than the open one.
    #[error("func_end '{found}' at instruction {at} closes function '{expected}'")]
    MismatchedFuncEnd {
        at: usize,
        expected: String,
        found: String,
    },

    /// `func_start` while another function is open.
    #[error("function '{name}' at instruction {at} is nested inside another function")]
    NestedFunction { at: usize, name: String },

    /// `param` not directly after `func_start` or another `param`.
    #[error("param at instruction {at} does not follow func_start")]
    MisplacedParam { at: usize },

    /// An instruction outside every function body.
    #[error("'{opcode}' at instruction {at} is outside any function")]
    OutsideFunction { at: usize, opcode: Opcode },

    // --- Labels ---
    #[error("label '{label}' defined twice (again at instruction {at})")]
    DuplicateLabel { at: usize, label: String },

    #[error("jump to undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: usize, label: String },

    // --- Calls ---
    #[error("function '{name}' defined twice (again at instruction {at})")]
    DuplicateFunction { at: usize, name: String },

    #[error("call to undefined function '{name}' at instruction {at}")]
    UndefinedFunction { at: usize, name: String },

    /// Call-site argument count differs from the callee's `param` count.
    #[error("call to '{function}' at instruction {at} passes {found} argument(s), expected {expected}")]
    ArityMismatch {
        at: usize,
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("program has no 'main' function")]
    MissingMain,

    // --- Operands ---
    /// A field holds an operand its opcode does not accept.
    #[error("'{opcode}' at instruction {at}: {field} cannot be {operand}")]
    InvalidOperand {
        at: usize,
        opcode: Opcode,
        field: &'static str,
        operand: String,
    },

    /// `retval` used anywhere other than a `move` directly after a `call`.
    #[error("retval at instruction {at} is not read by a move directly after a call")]
    MisplacedRetVal { at: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(VerifyError::MissingMain.to_string(), "program has no 'main' function");
        assert_eq!(
            VerifyError::OutsideFunction {
                at: 0,
                opcode: Opcode::Print
            }
            .to_string(),
            "'print' at instruction 0 is outside any function"
        );
        assert_eq!(
            VerifyError::InvalidOperand {
                at: 3,
                opcode: Opcode::Add,
                field: "result",
                operand: "5".into()
            }
            .to_string(),
            "'add' at instruction 3: result cannot be 5"
        );
    }

    #[test]
    fn every_variant_has_a_message() {
        let errors = vec![
            VerifyError::UnclosedFunction {
                at: 0,
                name: "f".into(),
            },
            VerifyError::UnmatchedFuncEnd {
                at: 0,
                name: "f".into(),
            },
            VerifyError::MismatchedFuncEnd {
                at: 0,
                expected: "f".into(),
                found: "g".into(),
            },
            VerifyError::NestedFunction {
                at: 0,
                name: "g".into(),
            },
            VerifyError::MisplacedParam { at: 0 },
            VerifyError::DuplicateLabel {
                at: 0,
                label: "L0".into(),
            },
            VerifyError::UndefinedLabel {
                at: 0,
                label: "L9".into(),
            },
            VerifyError::DuplicateFunction {
                at: 0,
                name: "f".into(),
            },
            VerifyError::UndefinedFunction {
                at: 0,
                name: "g".into(),
            },
            VerifyError::ArityMismatch {
                at: 0,
                function: "f".into(),
                expected: 2,
                found: 1,
            },
            VerifyError::MisplacedRetVal { at: 0 },
        ];
        for error in &errors {
            assert!(!error.to_string().is_empty(), "empty display for {error:?}");
        }
    }
}
