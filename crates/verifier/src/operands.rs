//! Operand pass: every field holds the kind of operand its opcode expects.
//!
//! Also pins down where `retval` may appear: only as the source of a `move`
//! that directly follows a `call`.

use crate::error::VerifyError;
use simpl_common::{Instruction, Opcode, Operand};

/// What a field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Must be absent.
    Empty,
    /// A variable, label or function name.
    Name,
    /// Literal or name.
    Value,
    /// Literal, name or absent (`ret`).
    OptValue,
    /// Non-negative integer literal (`call` argc).
    Count,
    /// Literal, name or `retval` (`move`).
    Source,
}

/// Slots for `arg1`, `arg2` and `result`.
fn slots(opcode: Opcode) -> [Slot; 3] {
    use Slot::*;
    match opcode {
        Opcode::Var | Opcode::Label | Opcode::Goto | Opcode::FuncStart | Opcode::FuncEnd
        | Opcode::Param => [Name, Empty, Empty],
        Opcode::Assign => [Name, Value, Empty],
        Opcode::Print | Opcode::Arg => [Value, Empty, Empty],
        Opcode::IfzGoto => [Value, Name, Empty],
        Opcode::Ret => [OptValue, Empty, Empty],
        Opcode::Call => [Name, Count, Empty],
        Opcode::Move => [Source, Empty, Name],
        Opcode::Neg | Opcode::Not => [Value, Empty, Name],
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
        | Opcode::Or => [Value, Value, Name],
    }
}

fn accepts(slot: Slot, operand: &Operand) -> bool {
    match (slot, operand) {
        (Slot::Empty, Operand::None) => true,
        (Slot::Name, Operand::Name(_)) => true,
        (
            Slot::Value | Slot::OptValue | Slot::Source,
            Operand::Int(_) | Operand::Str(_) | Operand::Name(_),
        ) => true,
        (Slot::OptValue, Operand::None) => true,
        (Slot::Source, Operand::RetVal) => true,
        (Slot::Count, Operand::Int(n)) => *n >= 0,
        _ => false,
    }
}

/// Run the operand pass.
pub fn check_operands(instrs: &[Instruction]) -> Vec<VerifyError> {
    let mut errors = Vec::new();

    for (at, instr) in instrs.iter().enumerate() {
        let fields = [
            ("arg1", &instr.arg1),
            ("arg2", &instr.arg2),
            ("result", &instr.result),
        ];
        for ((field, operand), slot) in fields.into_iter().zip(slots(instr.opcode)) {
            if *operand == Operand::RetVal {
                let after_call = at > 0 && instrs[at - 1].opcode == Opcode::Call;
                if slot != Slot::Source || !after_call {
                    errors.push(VerifyError::MisplacedRetVal { at });
                }
                continue;
            }
            if !accepts(slot, operand) {
                errors.push(VerifyError::InvalidOperand {
                    at,
                    opcode: instr.opcode,
                    field,
                    operand: describe(operand),
                });
            }
        }
    }

    errors
}

fn describe(operand: &Operand) -> String {
    match operand {
        Operand::None => "empty".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_produce_valid_shapes() {
        let instrs = [
            Instruction::func_start("main"),
            Instruction::var("x"),
            Instruction::assign("x", Operand::string("s")),
            Instruction::binary(Opcode::Add, Operand::Int(1), Operand::name("x"), "t0"),
            Instruction::unary(Opcode::Not, Operand::name("t0"), "t1"),
            Instruction::ifz_goto(Operand::name("t1"), "L0"),
            Instruction::label("L0"),
            Instruction::arg(Operand::Int(3)),
            Instruction::call("f", 1),
            Instruction::move_to(Operand::RetVal, "t2"),
            Instruction::print(Operand::name("t2")),
            Instruction::ret(Operand::None),
            Instruction::func_end("main"),
        ];
        assert!(check_operands(&instrs).is_empty());
    }

    #[test]
    fn literal_destination() {
        let instrs = [Instruction::new(
            Opcode::Add,
            Operand::Int(1),
            Operand::Int(2),
            Operand::Int(3),
        )];
        assert_eq!(
            check_operands(&instrs),
            vec![VerifyError::InvalidOperand {
                at: 0,
                opcode: Opcode::Add,
                field: "result",
                operand: "3".into()
            }]
        );
    }

    #[test]
    fn missing_and_extra_fields() {
        let instrs = [
            Instruction::new(Opcode::Print, Operand::None, Operand::None, Operand::None),
            Instruction::new(Opcode::Goto, Operand::name("L0"), Operand::Int(1), Operand::None),
        ];
        let errors = check_operands(&instrs);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            VerifyError::InvalidOperand { at: 0, field: "arg1", operand, .. } if operand == "empty"
        ));
        assert!(matches!(
            &errors[1],
            VerifyError::InvalidOperand { at: 1, field: "arg2", .. }
        ));
    }

    #[test]
    fn call_count_must_be_non_negative_integer() {
        let instrs = [
            Instruction::new(Opcode::Call, Operand::name("f"), Operand::Int(-1), Operand::None),
            Instruction::new(Opcode::Call, Operand::name("f"), Operand::name("n"), Operand::None),
        ];
        assert_eq!(check_operands(&instrs).len(), 2);
    }

    #[test]
    fn retval_only_in_move_after_call() {
        let instrs = [
            Instruction::print(Operand::RetVal),
            Instruction::move_to(Operand::RetVal, "t0"),
            Instruction::call("f", 0),
            Instruction::move_to(Operand::RetVal, "t1"),
        ];
        assert_eq!(
            check_operands(&instrs),
            vec![
                VerifyError::MisplacedRetVal { at: 0 },
                VerifyError::MisplacedRetVal { at: 1 },
            ]
        );
    }
}
