//! Opcode definitions for simpl three-address code.
//!
//! The set is closed: a [`Program`](crate::Program) can only hold one of the
//! 27 opcodes below, so the VM never sees an unrecognized operation. Text
//! that names anything else is rejected while parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::TextError;

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Bindings and output
    /// Declare a variable in the current frame, initialized to 0.
    Var,
    /// Copy a value into a variable: `assign dst src`.
    Assign,
    /// Write a value and a newline to the output sink.
    Print,

    // Control flow
    /// Named jump target. No-op at runtime.
    Label,
    /// Unconditional jump to a label.
    Goto,
    /// Jump to a label when the condition is integer zero.
    IfzGoto,

    // Functions
    /// Store the return value and leave the current frame.
    Ret,
    /// Push a value onto the argument-passing stack.
    Arg,
    /// Enter a function: `call name argc`.
    Call,
    /// Function entry point; binds pending arguments to its parameters.
    FuncStart,
    /// Function exit without a value.
    FuncEnd,
    /// Formal parameter name, directly after `func_start`.
    Param,
    /// Copy a value (usually `retval`) into a destination.
    Move,

    // Arithmetic
    /// Integer addition.
    Add,
    /// Integer subtraction.
    Sub,
    /// Integer multiplication.
    Mul,
    /// Integer division. Division by zero is a runtime error.
    Div,

    // Comparison
    /// 1 if equal.
    Eq,
    /// 1 if not equal.
    Neq,
    /// 1 if left < right.
    Lt,
    /// 1 if left <= right.
    Le,
    /// 1 if left > right.
    Gt,
    /// 1 if left >= right.
    Ge,

    // Logic
    /// 1 if both operands are non-zero.
    And,
    /// 1 if either operand is non-zero.
    Or,

    // Unary
    /// Arithmetic negation.
    Neg,
    /// 1 if the operand is zero, else 0.
    Not,
}

/// All opcodes, in definition order.
pub const ALL_OPCODES: [Opcode; 27] = [
    Opcode::Var,
    Opcode::Assign,
    Opcode::Print,
    Opcode::Label,
    Opcode::Goto,
    Opcode::IfzGoto,
    Opcode::Ret,
    Opcode::Arg,
    Opcode::Call,
    Opcode::FuncStart,
    Opcode::FuncEnd,
    Opcode::Param,
    Opcode::Move,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Eq,
    Opcode::Neq,
    Opcode::Lt,
    Opcode::Le,
    Opcode::Gt,
    Opcode::Ge,
    Opcode::And,
    Opcode::Or,
    Opcode::Neg,
    Opcode::Not,
];

impl Opcode {
    /// Returns the textual mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Var => "var",
            Opcode::Assign => "assign",
            Opcode::Print => "print",
            Opcode::Label => "label",
            Opcode::Goto => "goto",
            Opcode::IfzGoto => "ifz_goto",
            Opcode::Ret => "ret",
            Opcode::Arg => "arg",
            Opcode::Call => "call",
            Opcode::FuncStart => "func_start",
            Opcode::FuncEnd => "func_end",
            Opcode::Param => "param",
            Opcode::Move => "move",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Eq => "eq",
            Opcode::Neq => "neq",
            Opcode::Lt => "lt",
            Opcode::Le => "le",
            Opcode::Gt => "gt",
            Opcode::Ge => "ge",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Neg => "neg",
            Opcode::Not => "not",
        }
    }

    /// Two source operands and a destination in `result`.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Eq
                | Opcode::Neq
                | Opcode::Lt
                | Opcode::Le
                | Opcode::Gt
                | Opcode::Ge
                | Opcode::And
                | Opcode::Or
        )
    }

    /// One source operand and a destination in `result`.
    pub fn is_unary(&self) -> bool {
        matches!(self, Opcode::Neg | Opcode::Not)
    }

    /// Opcodes whose label operand names a jump target.
    pub fn is_jump(&self) -> bool {
        matches!(self, Opcode::Goto | Opcode::IfzGoto)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == s)
            .copied()
            .ok_or_else(|| TextError::UnknownOpcode(s.to_string()))
    }
}
