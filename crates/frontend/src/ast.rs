//! Syntax tree for simpl programs.
//!
//! A program is a [`Block`] of top-level statements. Operators are closed
//! enums grouped by the kind of operand they accept, so later stages can map
//! them exhaustively.

use std::fmt;

use crate::token::Pos;

/// Declared type of a variable or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    Number,
    String,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeName::Number => "number",
            TypeName::String => "string",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub pos: Pos,
}

/// One name in a declaration, with its optional initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub init: Option<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: TypeName,
    pub name: String,
    pub pos: Pos,
}

/// An `if` or `elif` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondBlock {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    Declaration {
        ty: TypeName,
        vars: Vec<VarDecl>,
        pos: Pos,
    },
    Assignment {
        name: String,
        value: Expr,
        pos: Pos,
    },
    /// `if` followed by any number of `elif` arms, in source order.
    If {
        branches: Vec<CondBlock>,
        else_block: Option<Block>,
        pos: Pos,
    },
    While {
        cond: Expr,
        body: Block,
        pos: Pos,
    },
    Function(Function),
    Return {
        value: Option<Expr>,
        pos: Pos,
    },
    Print {
        value: Expr,
        pos: Pos,
    },
    Call(CallExpr),
}

impl Stmt {
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Block(block) => block.pos,
            Stmt::Function(func) => func.pos,
            Stmt::Call(call) => call.pos,
            Stmt::Declaration { pos, .. }
            | Stmt::Assignment { pos, .. }
            | Stmt::If { pos, .. }
            | Stmt::While { pos, .. }
            | Stmt::Return { pos, .. }
            | Stmt::Print { pos, .. } => *pos,
        }
    }
}

/// Arithmetic: `+ - * /`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison: `== != < <= > >=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Logic: `&& ||`. Both sides are always evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

/// Prefix `-` and `!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// `==` and `!=` are the only comparisons defined on strings.
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Neq)
    }
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number {
        value: i64,
        pos: Pos,
    },
    Str {
        value: String,
        pos: Pos,
    },
    Var {
        name: String,
        pos: Pos,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        pos: Pos,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
        pos: Pos,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        pos: Pos,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        pos: Pos,
    },
    Call(CallExpr),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Call(call) => call.pos,
            Expr::Number { pos, .. }
            | Expr::Str { pos, .. }
            | Expr::Var { pos, .. }
            | Expr::Binary { pos, .. }
            | Expr::Compare { pos, .. }
            | Expr::Logical { pos, .. }
            | Expr::Unary { pos, .. } => *pos,
        }
    }
}
