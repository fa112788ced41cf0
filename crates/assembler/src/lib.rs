//! simpl assembler: textual three-address code to and from a [`Program`].
//!
//! # Usage
//!
//! ```
//! use simpl_assembler::{assemble, disassemble};
//!
//! let text = "func_start main  \nprint \"hi\"  \nfunc_end main  \n";
//! let program = assemble(text).unwrap();
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Format
//!
//! - one instruction per line: the mnemonic, then its operands
//! - operands are whitespace separated; a quoted string is one operand
//! - `;` outside a string starts a comment
//! - blank lines and indentation are ignored
//!
//! The disassembler emits the canonical four-field form; the assembler
//! accepts it along with any other spacing.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use parser::parse_line;
use simpl_common::Program;
use tracing::debug;

/// Assemble text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        if let Some(instr) = parse_line(&tokens, line_num)? {
            instructions.push(instr);
        }
    }

    debug!(instructions = instructions.len(), "assembled program");
    Ok(Program::new(instructions))
}

/// Disassemble a program into canonical assembly text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
