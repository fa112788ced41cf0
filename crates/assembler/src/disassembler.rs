//! Disassembler: program to canonical assembly text.
//!
//! One instruction per line in its four-field form, absent fields left
//! empty. No indentation, no comments, no blank lines.

use simpl_common::Program;

/// Disassemble a program into canonical assembly text.
///
/// For programs whose instructions follow their opcode's operand pattern,
/// `assemble(disassemble(program)) == program`.
pub fn disassemble(program: &Program) -> String {
    program.iter().map(|instr| format!("{instr}\n")).collect()
}
