//! simpl verifier: static checks for three-address code.
//!
//! The verifier checks a `Program` before execution. It collects all errors
//! (not just the first) and returns them.
//!
//! # Usage
//!
//! ```
//! use simpl_common::{Instruction, Operand, Program};
//! use simpl_verifier::verify;
//!
//! let program = Program::new(vec![
//!     Instruction::func_start("main"),
//!     Instruction::print(Operand::Int(42)),
//!     Instruction::func_end("main"),
//! ]);
//!
//! assert!(verify(&program).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: function bracketing, `param` placement
//! 2. **Labels**: unique labels, resolvable jumps
//! 3. **Operands**: operand kinds per opcode, `retval` placement
//! 4. **Calls**: unique functions, call targets and arity, `main`

pub mod calls;
pub mod error;
pub mod labels;
pub mod operands;
pub mod structural;

pub use error::VerifyError;

use simpl_common::Program;
use tracing::debug;

/// Verify a program.
///
/// Returns `Ok(())` if the program passes all checks, or
/// `Err(Vec<VerifyError>)` with every error found.
///
/// If function bracketing is broken, the call pass is skipped.
pub fn verify(program: &Program) -> Result<(), Vec<VerifyError>> {
    let instrs = &program.instructions;
    let mut all_errors = Vec::new();

    let (ctx, structural_errors) = structural::check_structural(instrs);
    all_errors.extend(structural_errors);

    all_errors.extend(labels::check_labels(instrs));
    all_errors.extend(operands::check_operands(instrs));

    if !ctx.fatal {
        all_errors.extend(calls::check_calls(instrs, &ctx));
    }

    debug!(
        instructions = instrs.len(),
        functions = ctx.functions.len(),
        errors = all_errors.len(),
        "verified program"
    );

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpl_common::{Instruction, Operand};

    #[test]
    fn empty_program_has_no_main() {
        assert_eq!(
            verify(&Program::default()),
            Err(vec![VerifyError::MissingMain])
        );
    }

    #[test]
    fn multiple_errors_collected() {
        let program = Program::new(vec![
            Instruction::func_start("main"),
            Instruction::goto("L9"),
            Instruction::print(Operand::RetVal),
            Instruction::func_end("main"),
        ]);
        let errors = verify(&program).unwrap_err();
        assert_eq!(errors.len(), 2, "{errors:?}");
    }

    #[test]
    fn fatal_structure_skips_call_pass() {
        let program = Program::new(vec![
            Instruction::func_start("f"),
            Instruction::call("nope", 0),
        ]);
        let errors = verify(&program).unwrap_err();
        assert_eq!(
            errors,
            vec![VerifyError::UnclosedFunction {
                at: 0,
                name: "f".into()
            }]
        );
    }
}
