//! simpl virtual machine: executes three-address code.
//!
//! The VM walks a flat instruction array with a program counter and keeps:
//! - a stack of call frames, each binding variable names to values
//! - an argument stack carrying call arguments into the callee
//! - a return slot written by `ret` and read by `move retval`
//!
//! # Usage
//!
//! ```
//! use simpl_common::{Instruction, Operand, Program, Value};
//! use simpl_vm::run_with_output;
//!
//! let program = Program::new(vec![
//!     Instruction::func_start("main"),
//!     Instruction::print(Operand::Int(42)),
//!     Instruction::ret(Operand::Int(7)),
//!     Instruction::func_end("main"),
//! ]);
//!
//! let mut out = Vec::new();
//! let result = run_with_output(&program, &mut out).unwrap();
//! assert_eq!(out, b"42\n");
//! assert_eq!(result, Some(Value::Int(7)));
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod machine;

pub use config::{VmConfig, MAX_CALL_DEPTH};
pub use error::RuntimeError;
pub use machine::VM;

use std::io::{self, Write};

use simpl_common::{Program, Value};

/// Execute a program, printing to standard output.
///
/// Returns the value `main` returned, if any.
pub fn run(program: &Program) -> Result<Option<Value>, RuntimeError> {
    run_with_output(program, io::stdout().lock())
}

/// Execute a program with default limits, printing to `out`.
pub fn run_with_output<W: Write>(program: &Program, out: W) -> Result<Option<Value>, RuntimeError> {
    run_with_config(program, out, VmConfig::default())
}

/// Execute a program with explicit limits, printing to `out`.
pub fn run_with_config<W: Write>(
    program: &Program,
    out: W,
    config: VmConfig,
) -> Result<Option<Value>, RuntimeError> {
    let mut vm = VM::with_config(program, out, config)?;
    vm.execute()
}
