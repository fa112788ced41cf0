//! Label pass: unique labels, resolvable jumps.

use std::collections::HashSet;

use crate::error::VerifyError;
use simpl_common::{Instruction, Opcode};

/// Run the label pass.
pub fn check_labels(instrs: &[Instruction]) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let mut defined = HashSet::new();

    for (at, instr) in instrs.iter().enumerate() {
        if instr.opcode != Opcode::Label {
            continue;
        }
        if let Some(label) = instr.arg1.as_name() {
            if !defined.insert(label) {
                errors.push(VerifyError::DuplicateLabel {
                    at,
                    label: label.to_string(),
                });
            }
        }
    }

    for (at, instr) in instrs.iter().enumerate() {
        let target = match instr.opcode {
            Opcode::Goto => &instr.arg1,
            Opcode::IfzGoto => &instr.arg2,
            _ => continue,
        };
        // Non-name targets are reported by the operand pass.
        if let Some(label) = target.as_name() {
            if !defined.contains(label) {
                errors.push(VerifyError::UndefinedLabel {
                    at,
                    label: label.to_string(),
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpl_common::Operand;

    #[test]
    fn forward_and_backward_jumps_resolve() {
        let instrs = [
            Instruction::label("L0"),
            Instruction::ifz_goto(Operand::name("c"), "L1"),
            Instruction::goto("L0"),
            Instruction::label("L1"),
        ];
        assert!(check_labels(&instrs).is_empty());
    }

    #[test]
    fn duplicate_label() {
        let instrs = [Instruction::label("L0"), Instruction::label("L0")];
        assert_eq!(
            check_labels(&instrs),
            vec![VerifyError::DuplicateLabel {
                at: 1,
                label: "L0".into()
            }]
        );
    }

    #[test]
    fn undefined_targets() {
        let instrs = [
            Instruction::goto("nowhere"),
            Instruction::ifz_goto(Operand::Int(0), "L7"),
        ];
        assert_eq!(
            check_labels(&instrs),
            vec![
                VerifyError::UndefinedLabel {
                    at: 0,
                    label: "nowhere".into()
                },
                VerifyError::UndefinedLabel {
                    at: 1,
                    label: "L7".into()
                },
            ]
        );
    }
}
