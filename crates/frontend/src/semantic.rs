//! Semantic analysis: scoping, initialization and type rules.
//!
//! The analyzer walks the whole tree and stops at the first error. Function
//! signatures are collected before any body is checked, so functions may be
//! called before they are declared. A function's return type is not written
//! in the source; the first `return` fixes it.
//!
//! A call to a function whose return type is not known yet types as unknown
//! and passes every check. The bodies are therefore checked again until no
//! return type changes, so the last sweep sees every type that can be known.
//! What stays unknown only returns calls into its own recursion and never
//! produces a value.

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{BinaryOp, Block, CallExpr, Expr, Function, Stmt, TypeName};
use crate::error::SemanticError;
use crate::symbols::SymbolTable;
use crate::token::Pos;

/// Check a parsed program.
pub fn analyze(program: &Block) -> Result<(), SemanticError> {
    let mut analyzer = Analyzer::default();
    analyzer.collect_signatures(program)?;
    let mut sweeps = 0;
    loop {
        sweeps += 1;
        analyzer.changed = false;
        analyzer.value_calls.clear();
        for stmt in &program.statements {
            if let Stmt::Function(func) = stmt {
                analyzer.function(func)?;
            }
        }
        if !analyzer.changed {
            break;
        }
    }
    analyzer.check_value_calls()?;
    debug!(
        functions = analyzer.functions.len(),
        sweeps,
        "semantic analysis passed"
    );
    Ok(())
}

/// True for names the IR generator uses for its own purposes: the return
/// slot and temporaries `t0`, `t1`, ...
pub fn is_reserved_name(name: &str) -> bool {
    if name == "retval" {
        return true;
    }
    match name.strip_prefix('t') {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// What a function's `return` statements have produced so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Returns {
    /// No `return` seen yet.
    Nothing,
    /// `return;`
    Void,
    /// `return expr;`. The type is unknown while it only depends on calls
    /// to functions whose own return type is not fixed yet.
    Value(Option<TypeName>),
}

impl Returns {
    fn describe(self) -> String {
        match self {
            Returns::Nothing | Returns::Void => "no value".to_string(),
            Returns::Value(Some(ty)) => ty.to_string(),
            Returns::Value(None) => "a value".to_string(),
        }
    }
}

#[derive(Debug)]
struct Signature {
    params: Vec<TypeName>,
    returns: Returns,
}

#[derive(Debug, Default)]
struct Analyzer {
    functions: HashMap<String, Signature>,
    symbols: SymbolTable,
    current: String,
    /// Calls whose result is used, checked once every return type is known.
    value_calls: Vec<(String, Pos)>,
    /// A return type was learned during the current sweep.
    changed: bool,
}

impl Analyzer {
    fn collect_signatures(&mut self, program: &Block) -> Result<(), SemanticError> {
        for stmt in &program.statements {
            let Stmt::Function(func) = stmt else {
                return Err(SemanticError::TopLevelStatement { pos: stmt.pos() });
            };
            check_reserved(&func.name, func.pos)?;
            if self.functions.contains_key(&func.name) {
                return Err(SemanticError::DuplicateFunction {
                    pos: func.pos,
                    name: func.name.clone(),
                });
            }
            let signature = Signature {
                params: func.params.iter().map(|p| p.ty).collect(),
                returns: Returns::Nothing,
            };
            self.functions.insert(func.name.clone(), signature);
        }
        Ok(())
    }

    fn function(&mut self, func: &Function) -> Result<(), SemanticError> {
        self.current = func.name.clone();
        self.symbols = SymbolTable::new();
        self.symbols.enter();
        for param in &func.params {
            self.declare(&param.name, param.ty, true, param.pos)?;
        }
        for stmt in &func.body.statements {
            self.stmt(stmt)?;
        }
        self.symbols.exit();
        Ok(())
    }

    fn check_value_calls(&self) -> Result<(), SemanticError> {
        for (name, pos) in &self.value_calls {
            let returns = self.functions.get(name).map(|sig| sig.returns);
            if matches!(returns, Some(Returns::Nothing | Returns::Void)) {
                return Err(SemanticError::VoidValueUsed {
                    pos: *pos,
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    fn declare(
        &mut self,
        name: &str,
        ty: TypeName,
        initialized: bool,
        pos: Pos,
    ) -> Result<(), SemanticError> {
        check_reserved(name, pos)?;
        if !self.symbols.declare(name, ty, initialized) {
            return Err(SemanticError::DuplicateVariable {
                pos,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn block(&mut self, block: &Block) -> Result<(), SemanticError> {
        self.symbols.enter();
        for stmt in &block.statements {
            self.stmt(stmt)?;
        }
        self.symbols.exit();
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::Declaration { ty, vars, .. } => {
                for var in vars {
                    if let Some(init) = &var.init {
                        let found = self.expr(init)?;
                        expect_type(*ty, found, init.pos())?;
                    }
                    self.declare(&var.name, *ty, var.init.is_some(), var.pos)?;
                }
                Ok(())
            }
            Stmt::Assignment { name, value, pos } => {
                let symbol =
                    self.symbols
                        .lookup(name)
                        .ok_or_else(|| SemanticError::UndeclaredVariable {
                            pos: *pos,
                            name: name.clone(),
                        })?;
                let found = self.expr(value)?;
                expect_type(symbol.ty, found, value.pos())?;
                self.symbols.mark_initialized(name);
                Ok(())
            }
            Stmt::If {
                branches,
                else_block,
                ..
            } => {
                for branch in branches {
                    self.condition(&branch.cond)?;
                    self.block(&branch.body)?;
                }
                match else_block {
                    Some(block) => self.block(block),
                    None => Ok(()),
                }
            }
            Stmt::While { cond, body, .. } => {
                self.condition(cond)?;
                self.block(body)
            }
            Stmt::Function(func) => Err(SemanticError::NestedFunction {
                pos: func.pos,
                name: func.name.clone(),
            }),
            Stmt::Return { value, pos } => self.ret(value.as_ref(), *pos),
            Stmt::Print { value, .. } => self.expr(value).map(|_| ()),
            Stmt::Call(call) => self.call(call).map(|_| ()),
        }
    }

    fn condition(&mut self, cond: &Expr) -> Result<(), SemanticError> {
        let found = self.expr(cond)?;
        expect_type(TypeName::Number, found, cond.pos())
    }

    fn ret(&mut self, value: Option<&Expr>, pos: Pos) -> Result<(), SemanticError> {
        let found = match value {
            Some(expr) => Returns::Value(self.expr(expr)?),
            None => Returns::Void,
        };
        let Some(sig) = self.functions.get_mut(&self.current) else {
            return Ok(());
        };
        match (sig.returns, found) {
            (Returns::Nothing, found) => {
                sig.returns = found;
                self.changed = true;
            }
            (Returns::Void, Returns::Void) => {}
            (Returns::Value(None), Returns::Value(None)) => {}
            (Returns::Value(None), Returns::Value(ty)) => {
                sig.returns = Returns::Value(ty);
                self.changed = true;
            }
            (Returns::Value(Some(_)), Returns::Value(None)) => {}
            (Returns::Value(Some(a)), Returns::Value(Some(b))) if a == b => {}
            (expected, found) => {
                return Err(SemanticError::ReturnTypeMismatch {
                    pos,
                    name: self.current.clone(),
                    expected: expected.describe(),
                    found: found.describe(),
                })
            }
        }
        Ok(())
    }

    /// Check a call and return what the callee is known to produce.
    fn call(&mut self, call: &CallExpr) -> Result<Returns, SemanticError> {
        let (params, returns) = match self.functions.get(&call.name) {
            Some(sig) => (sig.params.clone(), sig.returns),
            None => {
                return Err(SemanticError::UndeclaredFunction {
                    pos: call.pos,
                    name: call.name.clone(),
                })
            }
        };
        if params.len() != call.args.len() {
            return Err(SemanticError::ArgumentCount {
                pos: call.pos,
                name: call.name.clone(),
                expected: params.len(),
                found: call.args.len(),
            });
        }
        for (arg, expected) in call.args.iter().zip(params) {
            let found = self.expr(arg)?;
            expect_type(expected, found, arg.pos())?;
        }
        Ok(returns)
    }

    /// Type of an expression; `None` while it depends on an unfixed return type.
    fn expr(&mut self, expr: &Expr) -> Result<Option<TypeName>, SemanticError> {
        match expr {
            Expr::Number { .. } => Ok(Some(TypeName::Number)),
            Expr::Str { .. } => Ok(Some(TypeName::String)),
            Expr::Var { name, pos } => {
                let symbol =
                    self.symbols
                        .lookup(name)
                        .ok_or_else(|| SemanticError::UndeclaredVariable {
                            pos: *pos,
                            name: name.clone(),
                        })?;
                if !symbol.initialized {
                    return Err(SemanticError::UninitializedVariable {
                        pos: *pos,
                        name: name.clone(),
                    });
                }
                Ok(Some(symbol.ty))
            }
            Expr::Binary {
                op,
                left,
                right,
                pos,
            } => {
                let lt = self.expr(left)?;
                let rt = self.expr(right)?;
                numeric_operand(op.symbol(), lt, *pos)?;
                numeric_operand(op.symbol(), rt, *pos)?;
                if *op == BinaryOp::Div
                    && matches!(**right, Expr::Number { value: 0, .. })
                {
                    return Err(SemanticError::DivisionByZero { pos: right.pos() });
                }
                Ok(Some(TypeName::Number))
            }
            Expr::Compare {
                op,
                left,
                right,
                pos,
            } => {
                let lt = self.expr(left)?;
                let rt = self.expr(right)?;
                if let (Some(l), Some(r)) = (lt, rt) {
                    if l != r {
                        return Err(SemanticError::TypeMismatch {
                            pos: right.pos(),
                            expected: l,
                            found: r,
                        });
                    }
                }
                if !op.is_equality() {
                    numeric_operand(op.symbol(), lt, *pos)?;
                    numeric_operand(op.symbol(), rt, *pos)?;
                }
                Ok(Some(TypeName::Number))
            }
            Expr::Logical {
                op,
                left,
                right,
                pos,
            } => {
                let lt = self.expr(left)?;
                let rt = self.expr(right)?;
                numeric_operand(op.symbol(), lt, *pos)?;
                numeric_operand(op.symbol(), rt, *pos)?;
                Ok(Some(TypeName::Number))
            }
            Expr::Unary { op, operand, pos } => {
                let ty = self.expr(operand)?;
                numeric_operand(op.symbol(), ty, *pos)?;
                Ok(Some(TypeName::Number))
            }
            Expr::Call(call) => {
                let returns = self.call(call)?;
                self.value_calls.push((call.name.clone(), call.pos));
                Ok(match returns {
                    Returns::Value(ty) => ty,
                    Returns::Nothing | Returns::Void => None,
                })
            }
        }
    }
}

fn check_reserved(name: &str, pos: Pos) -> Result<(), SemanticError> {
    if is_reserved_name(name) {
        return Err(SemanticError::ReservedName {
            pos,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn expect_type(
    expected: TypeName,
    found: Option<TypeName>,
    pos: Pos,
) -> Result<(), SemanticError> {
    match found {
        Some(found) if found != expected => Err(SemanticError::TypeMismatch {
            pos,
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

fn numeric_operand(op: &'static str, ty: Option<TypeName>, pos: Pos) -> Result<(), SemanticError> {
    match ty {
        Some(TypeName::String) => Err(SemanticError::UnsupportedOperator {
            pos,
            op,
            ty: TypeName::String,
        }),
        _ => Ok(()),
    }
}
