//! Recursive-descent parser: tokens to [`ast::Block`](crate::ast::Block).
//!
//! ```text
//! Program     ::= { Statement } EOF
//! Statement   ::= Declaration | Assignment | CallStmt | IfStatement
//!               | WhileLoop | FunctionDecl | PrintStatement | Block
//!               | ReturnStatement
//! Declaration ::= Type IDENT [ '=' Expr ] { ',' IDENT [ '=' Expr ] } ';'
//! Assignment  ::= IDENT '=' Expr ';'
//! CallStmt    ::= IDENT '(' [ Args ] ')' ';'
//! IfStatement ::= 'if' Expr Block { 'elif' Expr Block } [ 'else' Block ]
//! WhileLoop   ::= 'while' '(' Expr ')' Statement
//! FunctionDecl::= 'func' IDENT '(' [ Type IDENT { ',' Type IDENT } ] ')' Block
//! Expr        ::= Or
//! Or ::= And { '||' And }         And  ::= Eq { '&&' Eq }
//! Eq ::= Rel { ('=='|'!=') Rel }  Rel  ::= Add { ('<'|'>'|'<='|'>=') Add }
//! Add ::= Term { ('+'|'-') Term } Term ::= Factor { ('*'|'/') Factor }
//! Factor  ::= ('!'|'-') Factor | Primary
//! Primary ::= IDENT [ '(' [ Args ] ')' ] | INT | STRING | '(' Expr ')'
//! ```

use crate::ast::{
    BinaryOp, Block, CallExpr, CompareOp, CondBlock, Expr, Function, LogicalOp, Param, Stmt,
    TypeName, UnaryOp, VarDecl,
};
use crate::error::{LexError, ParseError};
use crate::token::{Pos, Token, TokenKind};

/// Deepest statement or expression nesting accepted. Every later stage
/// walks the tree recursively, so the limit is enforced here.
pub const MAX_NESTING: usize = 128;

/// Parse a token stream produced by [`tokenize`](crate::lexer::tokenize).
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Block, ParseError> {
    Parser::new(tokens).program()
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Statements, groupings, calls and operators currently open.
    depth: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let pos = tokens.last().map_or(Pos::new(1, 1), |t| t.pos);
            tokens.push(Token::new(TokenKind::Eof, pos));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        // The stream always ends with Eof, and `advance` never moves past it.
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &TokenKind {
        let idx = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, expected: &'static str) -> ParseError {
        let token = self.peek();
        ParseError::Unexpected {
            pos: token.pos,
            expected,
            found: token.kind.to_string(),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<(String, Pos), ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let pos = self.advance().pos;
                Ok((name, pos))
            }
            _ => Err(self.error(expected)),
        }
    }

    /// Open one nesting level at `pos`. Callers restore `depth` once the
    /// nested construct is complete.
    fn nest(&mut self, pos: Pos) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::TooDeep {
                pos,
                limit: MAX_NESTING,
            });
        }
        Ok(())
    }

    fn type_name(&mut self) -> Option<TypeName> {
        let ty = match self.peek().kind {
            TokenKind::NumberType => TypeName::Number,
            TokenKind::StringType => TypeName::String,
            _ => return None,
        };
        self.advance();
        Some(ty)
    }

    fn program(&mut self) -> Result<Block, ParseError> {
        let pos = self.peek().pos;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.statement()?);
        }
        Ok(Block { statements, pos })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        let depth = self.depth;
        self.nest(self.peek().pos)?;
        let stmt = self.statement_kind()?;
        self.depth = depth;
        Ok(stmt)
    }

    fn statement_kind(&mut self) -> Result<Stmt, ParseError> {
        match &self.peek().kind {
            TokenKind::NumberType | TokenKind::StringType => self.declaration(),
            TokenKind::Ident(_) => match self.peek_next() {
                TokenKind::LParen => {
                    let call = self.call()?;
                    self.expect(&TokenKind::Semicolon, "';' after call")?;
                    Ok(Stmt::Call(call))
                }
                _ => self.assignment(),
            },
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_loop(),
            TokenKind::Func => self.function().map(Stmt::Function),
            TokenKind::Print => self.print_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::LBrace => self.block().map(Stmt::Block),
            _ => Err(self.error("statement")),
        }
    }

    fn block(&mut self) -> Result<Block, ParseError> {
        let pos = self.expect(&TokenKind::LBrace, "'{'")?.pos;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.error("'}'"));
            }
            statements.push(self.statement()?);
        }
        self.advance();
        Ok(Block { statements, pos })
    }

    fn declaration(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.peek().pos;
        let ty = self
            .type_name()
            .ok_or_else(|| self.error("'number' or 'string'"))?;
        let mut vars = Vec::new();
        loop {
            let (name, var_pos) = self.expect_ident("variable name")?;
            let init = if self.eat(&TokenKind::Assign) {
                Some(self.expression()?)
            } else {
                None
            };
            vars.push(VarDecl {
                name,
                init,
                pos: var_pos,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Semicolon, "';' after declaration")?;
        Ok(Stmt::Declaration { ty, vars, pos })
    }

    fn assignment(&mut self) -> Result<Stmt, ParseError> {
        let (name, pos) = self.expect_ident("identifier")?;
        self.expect(&TokenKind::Assign, "'=' or '('")?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon, "';' after assignment")?;
        Ok(Stmt::Assignment { name, value, pos })
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.advance().pos;
        let mut branches = Vec::new();
        let cond = self.expression()?;
        let body = self.block()?;
        branches.push(CondBlock { cond, body });

        while self.eat(&TokenKind::Elif) {
            let cond = self.expression()?;
            let body = self.block()?;
            branches.push(CondBlock { cond, body });
        }

        let else_block = if self.eat(&TokenKind::Else) {
            Some(self.block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            branches,
            else_block,
            pos,
        })
    }

    fn while_loop(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.advance().pos;
        self.expect(&TokenKind::LParen, "'(' after 'while'")?;
        let cond = self.expression()?;
        self.expect(&TokenKind::RParen, "')' after while condition")?;
        let body = match self.statement()? {
            Stmt::Block(block) => block,
            stmt => Block {
                pos: stmt.pos(),
                statements: vec![stmt],
            },
        };
        Ok(Stmt::While { cond, body, pos })
    }

    fn function(&mut self) -> Result<Function, ParseError> {
        let pos = self.advance().pos;
        let (name, _) = self.expect_ident("function name")?;
        self.expect(&TokenKind::LParen, "'(' after function name")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self
                    .type_name()
                    .ok_or_else(|| self.error("parameter type 'number' or 'string'"))?;
                let (name, pos) = self.expect_ident("parameter name")?;
                params.push(Param { ty, name, pos });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')' after parameters")?;
        let body = self.block()?;
        Ok(Function {
            name,
            params,
            body,
            pos,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.advance().pos;
        self.expect(&TokenKind::LParen, "'(' after 'print'")?;
        let value = self.expression()?;
        self.expect(&TokenKind::RParen, "')' after print argument")?;
        self.expect(&TokenKind::Semicolon, "';' after print")?;
        Ok(Stmt::Print { value, pos })
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.advance().pos;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(&TokenKind::Semicolon, "';' after return")?;
        Ok(Stmt::Return { value, pos })
    }

    /// `IDENT '(' [ Expr { ',' Expr } ] ')'`
    fn call(&mut self) -> Result<CallExpr, ParseError> {
        let (name, pos) = self.expect_ident("function name")?;
        self.expect(&TokenKind::LParen, "'('")?;
        let depth = self.depth;
        self.nest(pos)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')' after arguments")?;
        self.depth = depth;
        Ok(CallExpr { name, args, pos })
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.or()
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.and()?;
        while self.check(&TokenKind::Or) {
            let pos = self.advance().pos;
            self.nest(pos)?;
            let right = self.and()?;
            left = logical(LogicalOp::Or, left, right, pos);
        }
        self.depth = depth;
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.equality()?;
        while self.check(&TokenKind::And) {
            let pos = self.advance().pos;
            self.nest(pos)?;
            let right = self.equality()?;
            left = logical(LogicalOp::And, left, right, pos);
        }
        self.depth = depth;
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.relational()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Eq => CompareOp::Eq,
                TokenKind::Neq => CompareOp::Neq,
                _ => break,
            };
            let pos = self.advance().pos;
            self.nest(pos)?;
            let right = self.relational()?;
            left = compare(op, left, right, pos);
        }
        self.depth = depth;
        Ok(left)
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Lt => CompareOp::Lt,
                TokenKind::Le => CompareOp::Le,
                TokenKind::Gt => CompareOp::Gt,
                TokenKind::Ge => CompareOp::Ge,
                _ => break,
            };
            let pos = self.advance().pos;
            self.nest(pos)?;
            let right = self.additive()?;
            left = compare(op, left, right, pos);
        }
        self.depth = depth;
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let pos = self.advance().pos;
            self.nest(pos)?;
            let right = self.term()?;
            left = binary(op, left, right, pos);
        }
        self.depth = depth;
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let pos = self.advance().pos;
            self.nest(pos)?;
            let right = self.factor()?;
            left = binary(op, left, right, pos);
        }
        self.depth = depth;
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.primary(),
        };
        let pos = self.advance().pos;
        let literal = match self.peek().kind {
            TokenKind::Int(magnitude) if op == UnaryOp::Neg => Some(magnitude),
            _ => None,
        };
        if let Some(magnitude) = literal {
            self.advance();
            return int_literal(-i128::from(magnitude), pos);
        }
        let depth = self.depth;
        self.nest(pos)?;
        let operand = self.factor()?;
        self.depth = depth;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            pos,
        })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Int(magnitude) => {
                self.advance();
                int_literal(i128::from(magnitude), token.pos)
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Str {
                    value,
                    pos: token.pos,
                })
            }
            TokenKind::Ident(name) => {
                if self.peek_next() == &TokenKind::LParen {
                    return self.call().map(Expr::Call);
                }
                self.advance();
                Ok(Expr::Var {
                    name,
                    pos: token.pos,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let depth = self.depth;
                self.nest(token.pos)?;
                let expr = self.expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                self.depth = depth;
                Ok(expr)
            }
            _ => Err(self.error("expression")),
        }
    }
}

/// `-` directly before a literal is part of it; only `-9223372036854775808`
/// needs that, since its magnitude alone does not fit a `number`.
fn int_literal(value: i128, pos: Pos) -> Result<Expr, ParseError> {
    let value = i64::try_from(value).map_err(|_| LexError::IntegerOutOfRange {
        pos,
        text: value.to_string(),
    })?;
    Ok(Expr::Number { value, pos })
}

fn binary(op: BinaryOp, left: Expr, right: Expr, pos: Pos) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        pos,
    }
}

fn compare(op: CompareOp, left: Expr, right: Expr, pos: Pos) -> Expr {
    Expr::Compare {
        op,
        left: Box::new(left),
        right: Box::new(right),
        pos,
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr, pos: Pos) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
        pos,
    }
}
