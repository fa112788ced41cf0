//! Call pass: unique functions, resolvable calls with matching arity, and
//! an entry point.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::VerifyError;
use crate::structural::{FuncInfo, ProgramContext};
use simpl_common::{Instruction, Opcode, Operand};

/// Run the call pass over a structurally sound program.
pub fn check_calls(instrs: &[Instruction], ctx: &ProgramContext) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let mut by_name: HashMap<&str, &FuncInfo> = HashMap::new();

    for func in &ctx.functions {
        match by_name.entry(func.name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(func);
            }
            Entry::Occupied(_) => errors.push(VerifyError::DuplicateFunction {
                at: func.start,
                name: func.name.clone(),
            }),
        }
    }
    if !by_name.contains_key("main") {
        errors.push(VerifyError::MissingMain);
    }

    for (at, instr) in instrs.iter().enumerate() {
        if instr.opcode != Opcode::Call {
            continue;
        }
        let Some(name) = instr.arg1.as_name() else {
            continue;
        };
        let Some(callee) = by_name.get(name) else {
            errors.push(VerifyError::UndefinedFunction {
                at,
                name: name.to_string(),
            });
            continue;
        };
        if let Operand::Int(argc) = instr.arg2 {
            if usize::try_from(argc).ok() != Some(callee.params.len()) {
                errors.push(VerifyError::ArityMismatch {
                    at,
                    function: name.to_string(),
                    expected: callee.params.len(),
                    found: argc.max(0) as usize,
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::check_structural;
    use simpl_common::Operand;

    fn run(instrs: &[Instruction]) -> Vec<VerifyError> {
        let (ctx, errors) = check_structural(instrs);
        assert!(errors.is_empty(), "{errors:?}");
        check_calls(instrs, &ctx)
    }

    #[test]
    fn matching_call() {
        let instrs = [
            Instruction::func_start("id"),
            Instruction::param("x"),
            Instruction::ret(Operand::name("x")),
            Instruction::func_end("id"),
            Instruction::func_start("main"),
            Instruction::arg(Operand::Int(1)),
            Instruction::call("id", 1),
            Instruction::func_end("main"),
        ];
        assert!(run(&instrs).is_empty());
    }

    #[test]
    fn missing_main() {
        let instrs = [Instruction::func_start("f"), Instruction::func_end("f")];
        assert_eq!(run(&instrs), vec![VerifyError::MissingMain]);
    }

    #[test]
    fn duplicate_function() {
        let instrs = [
            Instruction::func_start("main"),
            Instruction::func_end("main"),
            Instruction::func_start("main"),
            Instruction::func_end("main"),
        ];
        assert_eq!(
            run(&instrs),
            vec![VerifyError::DuplicateFunction {
                at: 2,
                name: "main".into()
            }]
        );
    }

    #[test]
    fn undefined_callee_and_wrong_arity() {
        let instrs = [
            Instruction::func_start("f"),
            Instruction::param("a"),
            Instruction::func_end("f"),
            Instruction::func_start("main"),
            Instruction::call("g", 0),
            Instruction::call("f", 2),
            Instruction::func_end("main"),
        ];
        assert_eq!(
            run(&instrs),
            vec![
                VerifyError::UndefinedFunction {
                    at: 4,
                    name: "g".into()
                },
                VerifyError::ArityMismatch {
                    at: 5,
                    function: "f".into(),
                    expected: 1,
                    found: 2
                },
            ]
        );
    }
}
