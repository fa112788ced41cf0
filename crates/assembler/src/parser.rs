//! Parser for simpl assembly tokens to instructions.
//!
//! Each opcode has a fixed operand pattern, so empty fields need no
//! placeholder: `move retval t3` fills `arg1` and `result`.

use crate::error::AsmError;
use simpl_common::{Instruction, Opcode, Operand, TextError};

/// Instruction field an operand token is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Arg1,
    Arg2,
    Result,
}

const FIRST: &[Field] = &[Field::Arg1];
const FIRST_SECOND: &[Field] = &[Field::Arg1, Field::Arg2];
const FIRST_RESULT: &[Field] = &[Field::Arg1, Field::Result];
const ALL: &[Field] = &[Field::Arg1, Field::Arg2, Field::Result];

/// Fields the operand tokens fill, in order, and how many trailing tokens
/// may be left out.
fn pattern(opcode: Opcode) -> (&'static [Field], usize) {
    match opcode {
        Opcode::Ret => (FIRST, 1),
        Opcode::Var
        | Opcode::Print
        | Opcode::Label
        | Opcode::Goto
        | Opcode::Arg
        | Opcode::FuncStart
        | Opcode::FuncEnd
        | Opcode::Param => (FIRST, 0),
        Opcode::Assign | Opcode::IfzGoto | Opcode::Call => (FIRST_SECOND, 0),
        Opcode::Move | Opcode::Neg | Opcode::Not => (FIRST_RESULT, 0),
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
        | Opcode::Or => (ALL, 0),
    }
}

/// Parse the tokens of one line into an instruction.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(tokens: &[&str], line_num: usize) -> Result<Option<Instruction>, AsmError> {
    let Some((&mnemonic, operands)) = tokens.split_first() else {
        return Ok(None);
    };

    let opcode: Opcode = mnemonic.parse().map_err(|_| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let (fields, optional) = pattern(opcode);
    if operands.len() + optional < fields.len() {
        return Err(AsmError::MissingArgument {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected: fields.len(),
        });
    }
    if let Some(extra) = operands.get(fields.len()) {
        return Err(AsmError::UnexpectedToken {
            line: line_num,
            token: extra.to_string(),
        });
    }

    let mut instr = Instruction::new(opcode, Operand::None, Operand::None, Operand::None);
    for (field, token) in fields.iter().zip(operands) {
        let operand = parse_operand(token, line_num)?;
        match field {
            Field::Arg1 => instr.arg1 = operand,
            Field::Arg2 => instr.arg2 = operand,
            Field::Result => instr.result = operand,
        }
    }

    Ok(Some(instr))
}

fn parse_operand(token: &str, line_num: usize) -> Result<Operand, AsmError> {
    token.parse().map_err(|source| match source {
        TextError::UnterminatedString(_) => AsmError::UnterminatedString { line: line_num },
        source => AsmError::InvalidOperand {
            line: line_num,
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &[&str]) -> Result<Option<Instruction>, AsmError> {
        parse_line(tokens, 1)
    }

    #[test]
    fn blank_line() {
        assert_eq!(parse(&[]), Ok(None));
    }

    #[test]
    fn binary_fills_all_fields() {
        assert_eq!(
            parse(&["add", "a", "-2", "t0"]),
            Ok(Some(Instruction::binary(
                Opcode::Add,
                Operand::name("a"),
                Operand::Int(-2),
                "t0"
            )))
        );
    }

    #[test]
    fn move_skips_arg2() {
        assert_eq!(
            parse(&["move", "retval", "t3"]),
            Ok(Some(Instruction::move_to(Operand::RetVal, "t3")))
        );
    }

    #[test]
    fn unary_skips_arg2() {
        assert_eq!(
            parse(&["not", "t1", "t2"]),
            Ok(Some(Instruction::unary(Opcode::Not, Operand::name("t1"), "t2")))
        );
    }

    #[test]
    fn ret_value_is_optional() {
        assert_eq!(parse(&["ret"]), Ok(Some(Instruction::ret(Operand::None))));
        assert_eq!(
            parse(&["ret", "\"done\""]),
            Ok(Some(Instruction::ret(Operand::string("done"))))
        );
    }

    #[test]
    fn call_argc() {
        assert_eq!(parse(&["call", "fact", "1"]), Ok(Some(Instruction::call("fact", 1))));
    }

    #[test]
    fn unknown_opcode() {
        assert_eq!(
            parse(&["jmp", "L0"]),
            Err(AsmError::UnknownOpcode {
                line: 1,
                token: "jmp".into()
            })
        );
    }

    #[test]
    fn missing_operand() {
        assert_eq!(
            parse(&["assign", "x"]),
            Err(AsmError::MissingArgument {
                line: 1,
                opcode: "assign",
                expected: 2
            })
        );
    }

    #[test]
    fn extra_operand() {
        assert_eq!(
            parse(&["label", "L0", "L1"]),
            Err(AsmError::UnexpectedToken {
                line: 1,
                token: "L1".into()
            })
        );
    }

    #[test]
    fn invalid_operands() {
        assert!(matches!(
            parse(&["print", "1x"]),
            Err(AsmError::InvalidOperand {
                source: TextError::InvalidOperand(_),
                ..
            })
        ));
        assert!(matches!(
            parse(&["print", "99999999999999999999"]),
            Err(AsmError::InvalidOperand {
                source: TextError::IntegerOutOfRange(_),
                ..
            })
        ));
        assert!(matches!(
            parse(&["print", r#""\q""#]),
            Err(AsmError::InvalidOperand {
                source: TextError::InvalidEscape { escape: 'q', .. },
                ..
            })
        ));
    }
}
