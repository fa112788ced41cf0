//! Shared types for simpl three-address code.
//!
//! - [`Opcode`]: the 27 TAC operations
//! - [`Operand`]: one instruction field (literal, name, `retval` or absent)
//! - [`Instruction`]: opcode plus `arg1`, `arg2` and `result`
//! - [`Program`]: a flat instruction sequence
//! - [`Value`]: runtime values held by the VM
//! - [`TextError`]: errors from reading opcodes and operands as text

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod value;

pub use error::TextError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{Operand, RETVAL};
pub use program::Program;
pub use value::Value;
