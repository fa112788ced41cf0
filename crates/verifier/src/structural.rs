//! Structural pass: function bracketing and parameter placement.
//!
//! Builds the [`ProgramContext`] the call pass reads.

use crate::error::VerifyError;
use simpl_common::{Instruction, Opcode};

/// A function found between `func_start` and `func_end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncInfo {
    pub name: String,
    /// Index of the `func_start` instruction.
    pub start: usize,
    /// Index of the matching `func_end`, if one was found.
    pub end: Option<usize>,
    /// Parameter names, in declaration order.
    pub params: Vec<String>,
}

/// Context built by the structural pass.
#[derive(Debug, Clone, Default)]
pub struct ProgramContext {
    /// Functions in program order, duplicates included.
    pub functions: Vec<FuncInfo>,
    /// Bracketing is broken badly enough that function extents can't be
    /// trusted. Passes that depend on them are skipped.
    pub fatal: bool,
}

/// Run the structural pass.
pub fn check_structural(instrs: &[Instruction]) -> (ProgramContext, Vec<VerifyError>) {
    let mut errors = Vec::new();
    let mut functions: Vec<FuncInfo> = Vec::new();
    let mut fatal = false;
    // Index into `functions` of the open function.
    let mut open: Option<usize> = None;

    for (at, instr) in instrs.iter().enumerate() {
        match instr.opcode {
            Opcode::FuncStart => {
                let name = instr.arg1.to_string();
                if let Some(outer) = open {
                    errors.push(VerifyError::NestedFunction { at, name });
                    errors.push(VerifyError::UnclosedFunction {
                        at: functions[outer].start,
                        name: functions[outer].name.clone(),
                    });
                    fatal = true;
                }
                let params = instrs[at + 1..]
                    .iter()
                    .take_while(|i| i.opcode == Opcode::Param)
                    .map(|i| i.arg1.to_string())
                    .collect();
                functions.push(FuncInfo {
                    name: instr.arg1.to_string(),
                    start: at,
                    end: None,
                    params,
                });
                open = Some(functions.len() - 1);
            }
            Opcode::FuncEnd => {
                let name = instr.arg1.to_string();
                match open.take() {
                    None => {
                        errors.push(VerifyError::UnmatchedFuncEnd { at, name });
                        fatal = true;
                    }
                    Some(index) => {
                        let func = &mut functions[index];
                        if func.name != name {
                            errors.push(VerifyError::MismatchedFuncEnd {
                                at,
                                expected: func.name.clone(),
                                found: name,
                            });
                        }
                        func.end = Some(at);
                    }
                }
            }
            Opcode::Param => {
                let follows_header = at
                    .checked_sub(1)
                    .map(|prev| matches!(instrs[prev].opcode, Opcode::FuncStart | Opcode::Param))
                    .unwrap_or(false);
                if !follows_header {
                    errors.push(VerifyError::MisplacedParam { at });
                }
            }
            opcode if open.is_none() => {
                errors.push(VerifyError::OutsideFunction { at, opcode });
            }
            _ => {}
        }
    }

    if let Some(index) = open {
        errors.push(VerifyError::UnclosedFunction {
            at: functions[index].start,
            name: functions[index].name.clone(),
        });
        fatal = true;
    }

    (ProgramContext { functions, fatal }, errors)
}
