//! simpl front end: source text to a checked syntax tree.
//!
//! ```
//! use simpl_frontend::{analyze, parse};
//!
//! let program = parse("func main() { number a = 2 + 3; print(a); }").unwrap();
//! analyze(&program).unwrap();
//! ```
//!
//! Stages:
//! - [`tokenize`]: characters to [`Token`]s
//! - [`parse`]: tokens to an [`ast::Block`]
//! - [`analyze`]: scoping, initialization and type checks

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod semantic;
pub mod token;

mod symbols;

pub use error::{LexError, ParseError, SemanticError};
pub use lexer::tokenize;
pub use parser::parse_tokens;
pub use printer::{dump_ast, dump_tokens};
pub use semantic::analyze;
pub use token::{Pos, Token, TokenKind};

use tracing::debug;

/// Tokenize and parse `source`.
pub fn parse(source: &str) -> Result<ast::Block, ParseError> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "lexed source");
    let program = parse_tokens(tokens)?;
    debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}
