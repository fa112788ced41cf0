//! Human-readable dumps of tokens and trees, for the `tokens` and `ast`
//! commands.

use std::fmt::Write;

use crate::ast::{Block, Expr, Stmt};
use crate::token::Token;

/// One token per line: `line:col<TAB>kind`.
pub fn dump_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{}\t{}", token.pos, token.kind);
    }
    out
}

/// Indented tree, two spaces per level.
pub fn dump_ast(program: &Block) -> String {
    let mut printer = Printer::default();
    printer.block("Program", program, 0);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn line(&mut self, indent: usize, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{:width$}{text}", "", width = indent * 2);
    }

    fn block(&mut self, title: &str, block: &Block, indent: usize) {
        self.line(indent, title);
        for stmt in &block.statements {
            self.stmt(stmt, indent + 1);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, indent: usize) {
        match stmt {
            Stmt::Block(block) => self.block("Block", block, indent),
            Stmt::Declaration { ty, vars, .. } => {
                self.line(indent, format_args!("Declaration({ty})"));
                for var in vars {
                    self.line(indent + 1, format_args!("VarDeclare({})", var.name));
                    if let Some(init) = &var.init {
                        self.expr(init, indent + 2);
                    }
                }
            }
            Stmt::Assignment { name, value, .. } => {
                self.line(indent, format_args!("Assignment({name})"));
                self.expr(value, indent + 1);
            }
            Stmt::If {
                branches,
                else_block,
                ..
            } => {
                self.line(indent, "If");
                for branch in branches {
                    self.line(indent + 1, "Condition:");
                    self.expr(&branch.cond, indent + 2);
                    self.block("Then", &branch.body, indent + 1);
                }
                if let Some(block) = else_block {
                    self.block("Else", block, indent + 1);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.line(indent, "While");
                self.line(indent + 1, "Condition:");
                self.expr(cond, indent + 2);
                self.block("Body", body, indent + 1);
            }
            Stmt::Function(func) => {
                self.line(indent, format_args!("Function({})", func.name));
                for param in &func.params {
                    self.line(indent + 1, format_args!("Param({} {})", param.ty, param.name));
                }
                self.block("Body", &func.body, indent + 1);
            }
            Stmt::Return { value, .. } => {
                self.line(indent, "Return");
                if let Some(value) = value {
                    self.expr(value, indent + 1);
                }
            }
            Stmt::Print { value, .. } => {
                self.line(indent, "Print");
                self.expr(value, indent + 1);
            }
            Stmt::Call(call) => {
                self.line(indent, format_args!("Call({})", call.name));
                for arg in &call.args {
                    self.expr(arg, indent + 1);
                }
            }
        }
    }

    fn expr(&mut self, expr: &Expr, indent: usize) {
        match expr {
            Expr::Number { value, .. } => self.line(indent, format_args!("Number({value})")),
            Expr::Str { value, .. } => self.line(indent, format_args!("String({value:?})")),
            Expr::Var { name, .. } => self.line(indent, format_args!("Variable({name})")),
            Expr::Binary {
                op, left, right, ..
            } => self.operands(indent, op.symbol(), left, right),
            Expr::Compare {
                op, left, right, ..
            } => self.operands(indent, op.symbol(), left, right),
            Expr::Logical {
                op, left, right, ..
            } => self.operands(indent, op.symbol(), left, right),
            Expr::Unary { op, operand, .. } => {
                self.line(indent, format_args!("Unary({})", op.symbol()));
                self.expr(operand, indent + 1);
            }
            Expr::Call(call) => {
                self.line(indent, format_args!("Call({})", call.name));
                for arg in &call.args {
                    self.expr(arg, indent + 1);
                }
            }
        }
    }

    fn operands(&mut self, indent: usize, symbol: &str, left: &Expr, right: &Expr) {
        self.line(indent, format_args!("Binary({symbol})"));
        self.expr(left, indent + 1);
        self.expr(right, indent + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, tokenize};

    #[test]
    fn tokens_one_per_line() {
        let tokens = tokenize("print(1);").unwrap();
        assert_eq!(
            dump_tokens(&tokens),
            "1:1\t'print'\n1:6\t'('\n1:7\tnumber 1\n1:8\t')'\n1:9\t';'\n1:10\tend of input\n"
        );
    }

    #[test]
    fn ast_dump_is_indented() {
        let program = parse("func main() { number a = 1 + 2; print(a); }").unwrap();
        let expected = "\
Program
  Function(main)
    Body
      Declaration(number)
        VarDeclare(a)
          Binary(+)
            Number(1)
            Number(2)
      Print
        Variable(a)
";
        assert_eq!(dump_ast(&program), expected);
    }

    #[test]
    fn ast_dump_if_and_strings() {
        let program = parse("func f(string s) { if s == \"x\" { return; } else { f(s); } }").unwrap();
        let dump = dump_ast(&program);
        assert!(dump.contains("    Param(string s)\n"));
        assert!(dump.contains("String(\"x\")"));
        assert!(dump.contains("Else\n"));
        assert!(dump.contains("Call(f)\n"));
    }
}
