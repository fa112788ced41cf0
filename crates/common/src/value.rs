//! Runtime value representation for the simpl VM.
//!
//! Values live in call frames, on the argument-passing stack, and in the
//! return slot.

use std::fmt;

/// Runtime value: a signed 64-bit integer or an owned string.
///
/// Comparison and logic opcodes produce `Int(0)` or `Int(1)`; there is no
/// separate boolean.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Owned UTF-8 string.
    Str(String),
}

impl Value {
    /// Source-language name of this value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "number",
            Value::Str(_) => "string",
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Int(_) => None,
            Value::Str(s) => Some(s),
        }
    }

    /// Boolean result encoded the way comparison opcodes produce it.
    pub fn from_bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }
}

/// Integers print in decimal, strings print raw (no quotes).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}
