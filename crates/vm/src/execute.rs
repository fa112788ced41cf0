//! Main execution loop and opcode dispatch for the simpl VM.

use std::cmp::Ordering;
use std::io::Write;

use simpl_common::{Instruction, Opcode, Operand, Value};
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::machine::{invalid_operand, CallFrame, VM};

/// Whether a comparison accepts two strings.
#[derive(Debug, Clone, Copy)]
enum Strings {
    Compare,
    Reject,
}

impl<'a, W: Write> VM<'a, W> {
    /// Run until the outermost frame is left or the program counter runs
    /// past the end.
    ///
    /// Returns the value `main` returned, if it returned one.
    pub fn execute(&mut self) -> Result<Option<Value>, RuntimeError> {
        let program = self.program;

        while !self.frames.is_empty() {
            let Some(instr) = program.get(self.pc) else {
                break;
            };
            if let Some(limit) = self.config.max_steps {
                if self.steps >= limit {
                    return Err(RuntimeError::StepLimitExceeded { at: self.pc, limit });
                }
            }
            self.steps += 1;
            trace!(pc = self.pc, instr = %instr, "dispatch");
            self.pc += 1;

            match instr.opcode {
                Opcode::Var => {
                    let at = self.pc - 1;
                    self.store(&instr.arg1, Value::Int(0), at)?;
                }
                Opcode::Assign => {
                    let at = self.pc - 1;
                    let value = self.resolve(&instr.arg2, at)?;
                    self.store(&instr.arg1, value, at)?;
                }
                Opcode::Print => self.exec_print(instr)?,
                Opcode::Label | Opcode::Param => {}
                Opcode::Goto => {
                    self.pc = self.label_target(&instr.arg1, self.pc - 1)?;
                }
                Opcode::IfzGoto => self.exec_ifz_goto(instr)?,

                Opcode::Ret => self.exec_ret(instr)?,
                Opcode::Arg => {
                    let value = self.resolve(&instr.arg1, self.pc - 1)?;
                    self.args.push(value);
                }
                Opcode::Call => self.exec_call(instr)?,
                Opcode::FuncStart => self.exec_func_start(instr)?,
                Opcode::FuncEnd => {
                    self.last_return = None;
                    self.leave_frame()?;
                }
                Opcode::Move => self.exec_move(instr)?,

                Opcode::Add => self.exec_arith(instr, |a, b| Some(a.wrapping_add(b)))?,
                Opcode::Sub => self.exec_arith(instr, |a, b| Some(a.wrapping_sub(b)))?,
                Opcode::Mul => self.exec_arith(instr, |a, b| Some(a.wrapping_mul(b)))?,
                Opcode::Div => self.exec_arith(instr, |a, b| (b != 0).then(|| a.wrapping_div(b)))?,

                Opcode::Eq => self.exec_comparison(instr, Strings::Compare, Ordering::is_eq)?,
                Opcode::Neq => self.exec_comparison(instr, Strings::Compare, Ordering::is_ne)?,
                Opcode::Lt => self.exec_comparison(instr, Strings::Reject, Ordering::is_lt)?,
                Opcode::Le => self.exec_comparison(instr, Strings::Reject, Ordering::is_le)?,
                Opcode::Gt => self.exec_comparison(instr, Strings::Reject, Ordering::is_gt)?,
                Opcode::Ge => self.exec_comparison(instr, Strings::Reject, Ordering::is_ge)?,

                Opcode::And => self.exec_arith(instr, |a, b| Some(i64::from(a != 0 && b != 0)))?,
                Opcode::Or => self.exec_arith(instr, |a, b| Some(i64::from(a != 0 || b != 0)))?,

                Opcode::Neg => self.exec_unary(instr, i64::wrapping_neg)?,
                Opcode::Not => self.exec_unary(instr, |a| i64::from(a == 0))?,
            }
        }

        debug!(steps = self.steps, "halted");
        Ok(self.last_return.take())
    }

    fn exec_print(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let value = self.resolve(&instr.arg1, at)?;
        writeln!(self.out, "{value}").map_err(|e| RuntimeError::Output {
            at,
            message: e.to_string(),
        })
    }

    /// Integer zero jumps, any other integer falls through.
    fn exec_ifz_goto(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        match self.resolve(&instr.arg1, at)? {
            Value::Int(0) => self.pc = self.label_target(&instr.arg2, at)?,
            Value::Int(_) => {}
            Value::Str(_) => {
                return Err(RuntimeError::TypeMismatch {
                    at,
                    op: Opcode::IfzGoto.mnemonic(),
                    expected: "number",
                    found: "string",
                })
            }
        }
        Ok(())
    }

    // ---- Functions ----

    fn exec_call(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let name = instr
            .arg1
            .as_name()
            .ok_or_else(|| invalid_operand(&instr.arg1, at))?;
        let argc = match instr.arg2 {
            Operand::Int(n) if n >= 0 => n as usize,
            ref other => return Err(invalid_operand(other, at)),
        };
        let target = *self
            .functions
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                at,
                name: name.to_string(),
            })?;
        if self.args.len() < argc {
            return Err(RuntimeError::ArityMismatch {
                at,
                function: name.to_string(),
                expected: argc,
                found: self.args.len(),
            });
        }
        if self.frames.len() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                at,
                limit: self.config.max_call_depth,
            });
        }

        debug!(function = name, argc, depth = self.frames.len() + 1, "call");
        self.last_return = None;
        self.frames.push(CallFrame::new(Some(self.pc), argc));
        self.pc = target;
        Ok(())
    }

    /// Bind pending arguments to the `param` run that follows. The last
    /// pushed argument binds to the last parameter.
    fn exec_func_start(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let program = self.program;
        let params: Vec<&Operand> = program.instructions[self.pc..]
            .iter()
            .take_while(|i| i.opcode == Opcode::Param)
            .map(|i| &i.arg1)
            .collect();

        let function = || instr.arg1.to_string();
        let argc = self.frame(at)?.argc;
        if argc != params.len() {
            return Err(RuntimeError::ArityMismatch {
                at,
                function: function(),
                expected: params.len(),
                found: argc,
            });
        }
        if self.args.len() < params.len() {
            return Err(RuntimeError::ArityMismatch {
                at,
                function: function(),
                expected: params.len(),
                found: self.args.len(),
            });
        }

        let values = self.args.split_off(self.args.len() - params.len());
        for (offset, (param, value)) in params.iter().zip(values).enumerate() {
            self.store(param, value, self.pc + offset)?;
        }
        self.pc += params.len();
        Ok(())
    }

    fn exec_ret(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        self.last_return = match &instr.arg1 {
            Operand::None => None,
            operand => Some(self.resolve(operand, at)?),
        };
        self.leave_frame()
    }

    /// Pop the current frame and resume the caller, or halt when the
    /// outermost frame is left.
    fn leave_frame(&mut self) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let frame = self
            .frames
            .pop()
            .ok_or(RuntimeError::StackUnderflow { at })?;
        debug!(depth = self.frames.len(), returned = self.last_return.is_some(), "return");
        if let Some(return_pc) = frame.return_pc {
            self.pc = return_pc;
        }
        Ok(())
    }

    /// `move retval dst` consumes the return slot; any other source is copied.
    fn exec_move(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let value = match instr.arg1 {
            Operand::RetVal => self
                .last_return
                .take()
                .ok_or(RuntimeError::MissingReturnValue { at })?,
            ref src => self.resolve(src, at)?,
        };
        self.store(&instr.result, value, at)
    }

    // ---- Arithmetic, logic, comparison ----

    /// Integer binary operation. `op` returns `None` only for division by
    /// zero.
    fn exec_arith(
        &mut self,
        instr: &Instruction,
        op: impl Fn(i64, i64) -> Option<i64>,
    ) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let mnemonic = instr.opcode.mnemonic();
        let a = expect_int(self.resolve(&instr.arg1, at)?, mnemonic, at)?;
        let b = expect_int(self.resolve(&instr.arg2, at)?, mnemonic, at)?;
        let result = op(a, b).ok_or(RuntimeError::DivisionByZero { at })?;
        self.store(&instr.result, Value::Int(result), at)
    }

    fn exec_unary(&mut self, instr: &Instruction, op: impl Fn(i64) -> i64) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let a = expect_int(self.resolve(&instr.arg1, at)?, instr.opcode.mnemonic(), at)?;
        self.store(&instr.result, Value::Int(op(a)), at)
    }

    /// Integers compare fully; strings only where `strings` allows it.
    fn exec_comparison(
        &mut self,
        instr: &Instruction,
        strings: Strings,
        test: fn(Ordering) -> bool,
    ) -> Result<(), RuntimeError> {
        let at = self.pc - 1;
        let op = instr.opcode.mnemonic();
        let left = self.resolve(&instr.arg1, at)?;
        let right = self.resolve(&instr.arg2, at)?;

        let result = match (&left, &right, strings) {
            (Value::Int(a), Value::Int(b), _) => test(a.cmp(b)),
            (Value::Str(a), Value::Str(b), Strings::Compare) => test(a.cmp(b)),
            (Value::Str(_), Value::Str(_), Strings::Reject) => {
                return Err(RuntimeError::TypeMismatch {
                    at,
                    op,
                    expected: "number",
                    found: "string",
                })
            }
            _ => {
                return Err(RuntimeError::TypeMismatch {
                    at,
                    op,
                    expected: left.type_name(),
                    found: right.type_name(),
                })
            }
        };
        self.store(&instr.result, Value::from_bool(result), at)
    }
}

fn expect_int(value: Value, op: &'static str, at: usize) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(n),
        other => Err(RuntimeError::TypeMismatch {
            at,
            op,
            expected: "number",
            found: other.type_name(),
        }),
    }
}
