//! Source text to tokens.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::LexError;
use crate::token::{Pos, Token, TokenKind};

/// Split `source` into tokens. The result always ends with [`TokenKind::Eof`].
///
/// Whitespace separates tokens and `//` starts a comment that runs to the end
/// of the line.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.line, self.col)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Consume the next character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let pos = self.pos();
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, pos));
                return Ok(tokens);
            };
            let kind = if c.is_ascii_digit() {
                self.number(pos)?
            } else if c.is_ascii_alphabetic() {
                self.word()
            } else if c == '"' {
                self.string(pos)?
            } else {
                self.symbol(pos)?
            };
            tokens.push(Token::new(kind, pos));
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.next() != Some('/') {
                        return;
                    }
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                _ => return,
            }
        }
    }

    fn number(&mut self, pos: Pos) -> Result<TokenKind, LexError> {
        let mut text = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            text.push(c);
            self.bump();
        }
        if let Some(c) = self
            .peek()
            .filter(|c| c.is_ascii_alphabetic() || *c == '_' || *c == '.')
        {
            text.push(c);
            return Err(LexError::MalformedNumber { pos, text });
        }
        text.parse::<u64>()
            .ok()
            .filter(|n| *n <= i64::MIN.unsigned_abs())
            .map(TokenKind::Int)
            .ok_or(LexError::IntegerOutOfRange { pos, text })
    }

    fn word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            text.push(c);
            self.bump();
        }
        TokenKind::keyword(&text).unwrap_or(TokenKind::Ident(text))
    }

    /// String literals have no escapes and may span lines.
    fn string(&mut self, pos: Pos) -> Result<TokenKind, LexError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(TokenKind::Str(text)),
                Some(c) => text.push(c),
                None => return Err(LexError::UnterminatedString { pos }),
            }
        }
    }

    fn symbol(&mut self, pos: Pos) -> Result<TokenKind, LexError> {
        let Some(c) = self.bump() else {
            return Ok(TokenKind::Eof);
        };
        let kind = match c {
            '=' if self.eat('=') => TokenKind::Eq,
            '=' => TokenKind::Assign,
            '!' if self.eat('=') => TokenKind::Neq,
            '!' => TokenKind::Not,
            '<' if self.eat('=') => TokenKind::Le,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::Ge,
            '>' => TokenKind::Gt,
            '&' if self.eat('&') => TokenKind::And,
            '|' if self.eat('|') => TokenKind::Or,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ch => return Err(LexError::UnexpectedChar { pos, ch }),
        };
        Ok(kind)
    }
}
