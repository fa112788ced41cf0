//! Three-address instructions.
//!
//! Every instruction has an opcode and three operand fields. Which fields an
//! opcode uses is fixed:
//! ```text
//! var n            assign dst src      print v
//! label L          goto L              ifz_goto c L
//! ret [v]          arg v               call f argc
//! func_start f     func_end f          param p
//! move src -> dst  <binop> a b -> dst  <unop> a -> dst
//! ```
//! `-> dst` means the destination sits in the `result` field.

use std::fmt;

use crate::opcode::Opcode;
use crate::operand::Operand;

/// A single three-address instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// First operand. Meaning depends on opcode.
    pub arg1: Operand,
    /// Second operand. Meaning depends on opcode.
    pub arg2: Operand,
    /// Destination for value-producing opcodes.
    pub result: Operand,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: Opcode, arg1: Operand, arg2: Operand, result: Operand) -> Self {
        Self {
            opcode,
            arg1,
            arg2,
            result,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::new(Opcode::Var, Operand::name(name), Operand::None, Operand::None)
    }

    pub fn assign(dst: impl Into<String>, src: Operand) -> Self {
        Self::new(Opcode::Assign, Operand::name(dst), src, Operand::None)
    }

    pub fn print(value: Operand) -> Self {
        Self::new(Opcode::Print, value, Operand::None, Operand::None)
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::new(Opcode::Label, Operand::name(label), Operand::None, Operand::None)
    }

    pub fn goto(label: impl Into<String>) -> Self {
        Self::new(Opcode::Goto, Operand::name(label), Operand::None, Operand::None)
    }

    pub fn ifz_goto(cond: Operand, label: impl Into<String>) -> Self {
        Self::new(Opcode::IfzGoto, cond, Operand::name(label), Operand::None)
    }

    /// `ret` with [`Operand::None`] returns without a value.
    pub fn ret(value: Operand) -> Self {
        Self::new(Opcode::Ret, value, Operand::None, Operand::None)
    }

    pub fn arg(value: Operand) -> Self {
        Self::new(Opcode::Arg, value, Operand::None, Operand::None)
    }

    pub fn call(function: impl Into<String>, argc: usize) -> Self {
        Self::new(
            Opcode::Call,
            Operand::name(function),
            Operand::Int(argc as i64),
            Operand::None,
        )
    }

    pub fn func_start(name: impl Into<String>) -> Self {
        Self::new(Opcode::FuncStart, Operand::name(name), Operand::None, Operand::None)
    }

    pub fn func_end(name: impl Into<String>) -> Self {
        Self::new(Opcode::FuncEnd, Operand::name(name), Operand::None, Operand::None)
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::new(Opcode::Param, Operand::name(name), Operand::None, Operand::None)
    }

    pub fn move_to(src: Operand, dst: impl Into<String>) -> Self {
        Self::new(Opcode::Move, src, Operand::None, Operand::name(dst))
    }

    /// Binary arithmetic, comparison or logic: `op left right -> dst`.
    pub fn binary(op: Opcode, left: Operand, right: Operand, dst: impl Into<String>) -> Self {
        debug_assert!(op.is_binary(), "{op} is not a binary opcode");
        Self::new(op, left, right, Operand::name(dst))
    }

    /// Unary `neg`/`not`: `op operand -> dst`.
    pub fn unary(op: Opcode, operand: Operand, dst: impl Into<String>) -> Self {
        debug_assert!(op.is_unary(), "{op} is not a unary opcode");
        Self::new(op, operand, Operand::None, Operand::name(dst))
    }
}

/// Four space-separated fields; absent fields render empty.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.opcode, self.arg1, self.arg2, self.result
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_four_fields() {
        let instr = Instruction::binary(
            Opcode::Add,
            Operand::name("a"),
            Operand::Int(1),
            "t0",
        );
        assert_eq!(instr.to_string(), "add a 1 t0");
    }

    #[test]
    fn display_empty_fields() {
        assert_eq!(Instruction::var("x").to_string(), "var x  ");
        assert_eq!(Instruction::ret(Operand::None).to_string(), "ret   ");
        assert_eq!(
            Instruction::move_to(Operand::RetVal, "t3").to_string(),
            "move retval  t3"
        );
    }

    #[test]
    fn call_carries_argc() {
        let instr = Instruction::call("fact", 1);
        assert_eq!(instr.arg1, Operand::name("fact"));
        assert_eq!(instr.arg2, Operand::Int(1));
        assert_eq!(instr.to_string(), "call fact 1 ");
    }

    #[test]
    fn assign_field_layout() {
        let instr = Instruction::assign("a", Operand::string("hi"));
        assert_eq!(instr.opcode, Opcode::Assign);
        assert_eq!(instr.arg1, Operand::name("a"));
        assert_eq!(instr.arg2, Operand::string("hi"));
        assert!(instr.result.is_none());
    }

    #[test]
    fn ifz_goto_field_layout() {
        let instr = Instruction::ifz_goto(Operand::name("t1"), "L0");
        assert_eq!(instr.to_string(), "ifz_goto t1 L0 ");
    }
}
