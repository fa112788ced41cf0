//! Tree to instruction-stream lowering.
//!
//! Each expression lowers to the operand that holds its value: literals and
//! variables are used in place, every operator writes a fresh temporary.

use simpl_common::{Instruction, Opcode, Operand, Program};
use simpl_frontend::ast::{
    BinaryOp, Block, CallExpr, CompareOp, Expr, Function, LogicalOp, Stmt, UnaryOp,
};

/// Lowering state for one generation pass.
///
/// The temporary and label counters only ever grow, so every `tN` and `LN`
/// produced by one generator is unique.
#[derive(Debug, Default)]
pub struct Generator {
    code: Vec<Instruction>,
    temp_counter: usize,
    label_counter: usize,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a whole program. The generator can be reused; counters carry over.
    pub fn generate(&mut self, program: &Block) -> Program {
        self.block(program);
        Program::new(std::mem::take(&mut self.code))
    }

    fn new_temp(&mut self) -> String {
        let name = format!("t{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }

    fn new_label(&mut self) -> String {
        let name = format!("L{}", self.label_counter);
        self.label_counter += 1;
        name
    }

    fn emit(&mut self, instr: Instruction) {
        self.code.push(instr);
    }

    fn block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::Declaration { vars, .. } => {
                for var in vars {
                    let value = match &var.init {
                        Some(init) => self.expr(init),
                        None => Operand::Int(0),
                    };
                    self.emit(Instruction::var(&var.name));
                    self.emit(Instruction::assign(&var.name, value));
                }
            }
            Stmt::Assignment { name, value, .. } => {
                let value = self.expr(value);
                self.emit(Instruction::assign(name, value));
            }
            Stmt::If {
                branches,
                else_block,
                ..
            } => {
                let end = self.new_label();
                for branch in branches {
                    let cond = self.expr(&branch.cond);
                    let next = self.new_label();
                    self.emit(Instruction::ifz_goto(cond, &next));
                    self.block(&branch.body);
                    self.emit(Instruction::goto(&end));
                    self.emit(Instruction::label(next));
                }
                if let Some(block) = else_block {
                    self.block(block);
                }
                self.emit(Instruction::label(end));
            }
            Stmt::While { cond, body, .. } => {
                let start = self.new_label();
                let end = self.new_label();
                self.emit(Instruction::label(&start));
                let cond = self.expr(cond);
                self.emit(Instruction::ifz_goto(cond, &end));
                self.block(body);
                self.emit(Instruction::goto(start));
                self.emit(Instruction::label(end));
            }
            Stmt::Function(func) => self.function(func),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.expr(expr),
                    None => Operand::None,
                };
                self.emit(Instruction::ret(value));
            }
            Stmt::Print { value, .. } => {
                let value = self.expr(value);
                self.emit(Instruction::print(value));
            }
            Stmt::Call(call) => self.call(call),
        }
    }

    fn function(&mut self, func: &Function) {
        self.emit(Instruction::func_start(&func.name));
        for param in &func.params {
            self.emit(Instruction::param(&param.name));
        }
        self.block(&func.body);
        self.emit(Instruction::func_end(&func.name));
    }

    /// Arguments are evaluated and pushed left to right.
    fn call(&mut self, call: &CallExpr) {
        for arg in &call.args {
            let value = self.expr(arg);
            self.emit(Instruction::arg(value));
        }
        self.emit(Instruction::call(&call.name, call.args.len()));
    }

    fn expr(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::Number { value, .. } => Operand::Int(*value),
            Expr::Str { value, .. } => Operand::string(value.as_str()),
            Expr::Var { name, .. } => Operand::name(name.as_str()),
            Expr::Binary {
                op, left, right, ..
            } => self.binary(binary_opcode(*op), left, right),
            Expr::Compare {
                op, left, right, ..
            } => self.binary(compare_opcode(*op), left, right),
            Expr::Logical {
                op, left, right, ..
            } => self.binary(logical_opcode(*op), left, right),
            Expr::Unary { op, operand, .. } => {
                let operand = self.expr(operand);
                let dst = self.new_temp();
                self.emit(Instruction::unary(unary_opcode(*op), operand, &dst));
                Operand::Name(dst)
            }
            Expr::Call(call) => {
                self.call(call);
                let dst = self.new_temp();
                self.emit(Instruction::move_to(Operand::RetVal, &dst));
                Operand::Name(dst)
            }
        }
    }

    fn binary(&mut self, op: Opcode, left: &Expr, right: &Expr) -> Operand {
        let left = self.expr(left);
        let right = self.expr(right);
        let dst = self.new_temp();
        self.emit(Instruction::binary(op, left, right, &dst));
        Operand::Name(dst)
    }
}

fn binary_opcode(op: BinaryOp) -> Opcode {
    match op {
        BinaryOp::Add => Opcode::Add,
        BinaryOp::Sub => Opcode::Sub,
        BinaryOp::Mul => Opcode::Mul,
        BinaryOp::Div => Opcode::Div,
    }
}

fn compare_opcode(op: CompareOp) -> Opcode {
    match op {
        CompareOp::Eq => Opcode::Eq,
        CompareOp::Neq => Opcode::Neq,
        CompareOp::Lt => Opcode::Lt,
        CompareOp::Le => Opcode::Le,
        CompareOp::Gt => Opcode::Gt,
        CompareOp::Ge => Opcode::Ge,
    }
}

fn logical_opcode(op: LogicalOp) -> Opcode {
    match op {
        LogicalOp::And => Opcode::And,
        LogicalOp::Or => Opcode::Or,
    }
}

fn unary_opcode(op: UnaryOp) -> Opcode {
    match op {
        UnaryOp::Neg => Opcode::Neg,
        UnaryOp::Not => Opcode::Not,
    }
}
