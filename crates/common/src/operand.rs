//! Instruction operands.
//!
//! Textual rules, shared by the disassembler and the assembler:
//! - an optionally `-`-prefixed run of digits is an integer literal
//! - a token wrapped in `"` is a string literal (`\\ \" \n \t` escapes)
//! - `retval` is the return slot
//! - anything else must be a name: `[A-Za-z_][A-Za-z0-9_]*`
//!
//! The empty operand renders as the empty string.

use std::fmt;
use std::str::FromStr;

use crate::error::TextError;
use crate::value::Value;

/// Textual spelling of [`Operand::RetVal`].
pub const RETVAL: &str = "retval";

/// One field of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Operand {
    /// Absent field.
    #[default]
    None,
    /// Integer literal.
    Int(i64),
    /// String literal (unquoted, unescaped contents).
    Str(String),
    /// Variable, temporary, label or function name.
    Name(String),
    /// The VM's last-return slot.
    RetVal,
}

impl Operand {
    /// Build a name operand.
    pub fn name(name: impl Into<String>) -> Self {
        Operand::Name(name.into())
    }

    /// Build a string literal operand.
    pub fn string(s: impl Into<String>) -> Self {
        Operand::Str(s.into())
    }

    /// True for the absent field.
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }

    /// The name, if this operand is a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    /// The literal value, if this operand is a literal.
    pub fn literal(&self) -> Option<Value> {
        match self {
            Operand::Int(n) => Some(Value::Int(*n)),
            Operand::Str(s) => Some(Value::Str(s.clone())),
            _ => None,
        }
    }
}

/// True when `s` can be spelled as a bare name operand.
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(n) => write!(f, "{n}"),
            Operand::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Operand::Name(n) => f.write_str(n),
            Operand::RetVal => f.write_str(RETVAL),
        }
    }
}

impl FromStr for Operand {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Operand::None);
        }
        if let Some(rest) = s.strip_prefix('"') {
            return parse_string(s, rest).map(Operand::Str);
        }

        let digits = s.strip_prefix('-').unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<i64>()
                .map(Operand::Int)
                .map_err(|_| TextError::IntegerOutOfRange(s.to_string()));
        }

        if s == RETVAL {
            return Ok(Operand::RetVal);
        }
        if is_valid_name(s) {
            return Ok(Operand::Name(s.to_string()));
        }
        Err(TextError::InvalidOperand(s.to_string()))
    }
}

/// Decode the body of a quoted token. `rest` is everything after the
/// opening quote and must end with the closing one.
fn parse_string(token: &str, rest: &str) -> Result<String, TextError> {
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if chars.next().is_some() {
                    return Err(TextError::InvalidOperand(token.to_string()));
                }
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    return Err(TextError::InvalidEscape {
                        token: token.to_string(),
                        escape: other,
                    })
                }
                None => break,
            },
            c => out.push(c),
        }
    }

    Err(TextError::UnterminatedString(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_integers() {
        assert_eq!("42".parse(), Ok(Operand::Int(42)));
        assert_eq!("-7".parse(), Ok(Operand::Int(-7)));
        assert_eq!("0".parse(), Ok(Operand::Int(0)));
    }

    #[test]
    fn parse_integer_overflow() {
        assert_eq!(
            "9223372036854775808".parse::<Operand>(),
            Err(TextError::IntegerOutOfRange(
                "9223372036854775808".to_string()
            ))
        );
        assert_eq!(
            "-9223372036854775808".parse(),
            Ok(Operand::Int(i64::MIN))
        );
    }

    #[test]
    fn lone_minus_is_invalid() {
        assert_eq!(
            "-".parse::<Operand>(),
            Err(TextError::InvalidOperand("-".to_string()))
        );
    }

    #[test]
    fn parse_names_and_retval() {
        assert_eq!("t0".parse(), Ok(Operand::name("t0")));
        assert_eq!("L12".parse(), Ok(Operand::name("L12")));
        assert_eq!("_x1".parse(), Ok(Operand::name("_x1")));
        assert_eq!("retval".parse(), Ok(Operand::RetVal));
        assert_eq!("".parse(), Ok(Operand::None));
    }

    #[test]
    fn parse_invalid_name() {
        assert!("1abc".parse::<Operand>().is_err());
        assert!("a-b".parse::<Operand>().is_err());
    }

    #[test]
    fn parse_strings_with_escapes() {
        assert_eq!("\"hi\"".parse(), Ok(Operand::string("hi")));
        assert_eq!("\"\"".parse(), Ok(Operand::string("")));
        assert_eq!(
            r#""a \"b\"\n\\""#.parse(),
            Ok(Operand::string("a \"b\"\n\\"))
        );
    }

    #[test]
    fn parse_unterminated_string() {
        assert_eq!(
            "\"abc".parse::<Operand>(),
            Err(TextError::UnterminatedString("\"abc".to_string()))
        );
    }

    #[test]
    fn parse_bad_escape() {
        assert!(matches!(
            r#""a\qb""#.parse::<Operand>(),
            Err(TextError::InvalidEscape { escape: 'q', .. })
        ));
    }

    #[test]
    fn trailing_text_after_string_is_invalid() {
        assert!(matches!(
            "\"ab\"c".parse::<Operand>(),
            Err(TextError::InvalidOperand(_))
        ));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Operand::None.to_string(), "");
        assert_eq!(Operand::Int(-3).to_string(), "-3");
        assert_eq!(Operand::string("say \"hi\"").to_string(), r#""say \"hi\"""#);
        assert_eq!(Operand::string("a\tb\n").to_string(), r#""a\tb\n""#);
        assert_eq!(Operand::RetVal.to_string(), "retval");
    }

    #[test]
    fn literal_values() {
        assert_eq!(Operand::Int(5).literal(), Some(Value::Int(5)));
        assert_eq!(Operand::string("s").literal(), Some(Value::from("s")));
        assert_eq!(Operand::name("x").literal(), None);
        assert_eq!(Operand::RetVal.literal(), None);
    }
}
