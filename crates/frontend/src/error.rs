//! Front-end error types. Every variant carries the source position.

use thiserror::Error;

use crate::ast::TypeName;
use crate::token::Pos;

/// Errors produced while splitting source text into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{pos}: unexpected character '{ch}'")]
    UnexpectedChar { pos: Pos, ch: char },

    #[error("{pos}: unterminated string literal")]
    UnterminatedString { pos: Pos },

    /// A digit run directly followed by a letter, `_` or `.`.
    #[error("{pos}: malformed number '{text}'")]
    MalformedNumber { pos: Pos, text: String },

    #[error("{pos}: integer literal out of range: {text}")]
    IntegerOutOfRange { pos: Pos, text: String },
}

/// Errors produced while building the syntax tree. Only the first one is
/// reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{pos}: expected {expected}, found {found}")]
    Unexpected {
        pos: Pos,
        expected: &'static str,
        found: String,
    },

    /// Statements or expressions nested past [`MAX_NESTING`](crate::parser::MAX_NESTING).
    #[error("{pos}: nesting deeper than {limit} levels")]
    TooDeep { pos: Pos, limit: usize },
}

/// Errors produced by semantic analysis. The analyzer stops at the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("{pos}: only function declarations may appear at top level")]
    TopLevelStatement { pos: Pos },

    #[error("{pos}: function '{name}' declared inside another function")]
    NestedFunction { pos: Pos, name: String },

    #[error("{pos}: function '{name}' is already defined")]
    DuplicateFunction { pos: Pos, name: String },

    #[error("{pos}: variable '{name}' is already declared")]
    DuplicateVariable { pos: Pos, name: String },

    #[error("{pos}: use of undeclared variable '{name}'")]
    UndeclaredVariable { pos: Pos, name: String },

    #[error("{pos}: variable '{name}' is read before it is assigned")]
    UninitializedVariable { pos: Pos, name: String },

    #[error("{pos}: '{name}' is reserved")]
    ReservedName { pos: Pos, name: String },

    #[error("{pos}: type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        pos: Pos,
        expected: TypeName,
        found: TypeName,
    },

    #[error("{pos}: operator '{op}' cannot be applied to {ty}")]
    UnsupportedOperator {
        pos: Pos,
        op: &'static str,
        ty: TypeName,
    },

    #[error("{pos}: division by zero")]
    DivisionByZero { pos: Pos },

    #[error("{pos}: call to undeclared function '{name}'")]
    UndeclaredFunction { pos: Pos, name: String },

    #[error("{pos}: function '{name}' takes {expected} argument(s), {found} given")]
    ArgumentCount {
        pos: Pos,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{pos}: function '{name}' returns {found} here but {expected} earlier")]
    ReturnTypeMismatch {
        pos: Pos,
        name: String,
        expected: String,
        found: String,
    },

    #[error("{pos}: function '{name}' does not return a value")]
    VoidValueUsed { pos: Pos, name: String },
}

impl SemanticError {
    pub fn pos(&self) -> Pos {
        match self {
            SemanticError::TopLevelStatement { pos }
            | SemanticError::NestedFunction { pos, .. }
            | SemanticError::DuplicateFunction { pos, .. }
            | SemanticError::DuplicateVariable { pos, .. }
            | SemanticError::UndeclaredVariable { pos, .. }
            | SemanticError::UninitializedVariable { pos, .. }
            | SemanticError::ReservedName { pos, .. }
            | SemanticError::TypeMismatch { pos, .. }
            | SemanticError::UnsupportedOperator { pos, .. }
            | SemanticError::DivisionByZero { pos }
            | SemanticError::UndeclaredFunction { pos, .. }
            | SemanticError::ArgumentCount { pos, .. }
            | SemanticError::ReturnTypeMismatch { pos, .. }
            | SemanticError::VoidValueUsed { pos, .. } => *pos,
        }
    }
}
