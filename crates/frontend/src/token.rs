//! Tokens and source positions.

use std::fmt;

/// 1-based line and column of a token or tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// What a token is. Literal tokens carry their decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    NumberType,
    StringType,
    If,
    Elif,
    Else,
    While,
    Func,
    Return,
    Print,

    Ident(String),
    /// Magnitude of an integer literal. The sign is a separate `-` token,
    /// so this reaches 2^63 to allow the most negative `number`.
    Int(u64),
    Str(String),

    // Operators
    Assign,
    Eq,
    Not,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Plus,
    Minus,
    Star,
    Slash,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    Eof,
}

impl TokenKind {
    /// Keyword for an identifier-shaped word, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "number" => TokenKind::NumberType,
            "string" => TokenKind::StringType,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "func" => TokenKind::Func,
            "return" => TokenKind::Return,
            "print" => TokenKind::Print,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::NumberType => "'number'",
            TokenKind::StringType => "'string'",
            TokenKind::If => "'if'",
            TokenKind::Elif => "'elif'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::Func => "'func'",
            TokenKind::Return => "'return'",
            TokenKind::Print => "'print'",
            TokenKind::Ident(name) => return write!(f, "identifier '{name}'"),
            TokenKind::Int(n) => return write!(f, "number {n}"),
            TokenKind::Str(s) => return write!(f, "string \"{s}\""),
            TokenKind::Assign => "'='",
            TokenKind::Eq => "'=='",
            TokenKind::Not => "'!'",
            TokenKind::Neq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A token with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}
