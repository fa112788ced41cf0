//! VM state: frames, argument stack, return slot and the label/function
//! index.

use std::collections::HashMap;
use std::io::Write;

use simpl_common::{Opcode, Operand, Program, Value};
use tracing::debug;

use crate::config::VmConfig;
use crate::error::RuntimeError;

/// Bindings and return address for one function invocation.
#[derive(Debug, Clone, Default)]
pub struct CallFrame {
    /// Variables and temporaries, by name.
    pub(crate) vars: HashMap<String, Value>,
    /// Instruction to resume at when this frame is left. `None` halts.
    pub(crate) return_pc: Option<usize>,
    /// Argument count announced by the call site.
    pub(crate) argc: usize,
}

impl CallFrame {
    pub(crate) fn new(return_pc: Option<usize>, argc: usize) -> Self {
        Self {
            vars: HashMap::new(),
            return_pc,
            argc,
        }
    }
}

/// The simpl virtual machine.
///
/// Program output goes to `out`, one line per `print`.
pub struct VM<'a, W: Write> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) out: W,
    pub(crate) config: VmConfig,
    /// Label name to the index of its `label` instruction.
    pub(crate) labels: HashMap<String, usize>,
    /// Function name to the index of its `func_start` instruction.
    pub(crate) functions: HashMap<String, usize>,
    pub(crate) frames: Vec<CallFrame>,
    /// Evaluated arguments waiting for the next `func_start`.
    pub(crate) args: Vec<Value>,
    /// Value stored by the most recent `ret`, consumed by `move retval`.
    pub(crate) last_return: Option<Value>,
    /// Program counter (instruction index).
    pub(crate) pc: usize,
    /// Instructions executed so far.
    pub(crate) steps: u64,
}

impl<'a, W: Write> VM<'a, W> {
    /// Load a program with the default limits.
    pub fn new(program: &'a Program, out: W) -> Result<Self, RuntimeError> {
        Self::with_config(program, out, VmConfig::default())
    }

    /// Index labels and functions, then position at `main`.
    ///
    /// Fails on duplicate labels or functions, or when `main` is missing.
    pub fn with_config(
        program: &'a Program,
        out: W,
        config: VmConfig,
    ) -> Result<Self, RuntimeError> {
        let (labels, functions) = scan(program)?;
        let entry = *functions
            .get("main")
            .ok_or(RuntimeError::MissingEntryPoint)?;
        debug!(
            labels = labels.len(),
            functions = functions.len(),
            entry,
            "indexed program"
        );

        Ok(Self {
            program,
            out,
            config,
            labels,
            functions,
            frames: vec![CallFrame::new(None, 0)],
            args: Vec::new(),
            last_return: None,
            pc: entry,
            steps: 0,
        })
    }

    /// Values pushed by `arg` and not yet bound to parameters.
    pub fn pending_args(&self) -> &[Value] {
        &self.args
    }

    /// Number of active frames. Zero once the program has halted.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    pub(crate) fn frame(&self, at: usize) -> Result<&CallFrame, RuntimeError> {
        self.frames.last().ok_or(RuntimeError::StackUnderflow { at })
    }

    pub(crate) fn frame_mut(&mut self, at: usize) -> Result<&mut CallFrame, RuntimeError> {
        self.frames
            .last_mut()
            .ok_or(RuntimeError::StackUnderflow { at })
    }

    /// Value of an operand. Names resolve in the current frame only.
    pub(crate) fn resolve(&self, operand: &Operand, at: usize) -> Result<Value, RuntimeError> {
        match operand {
            Operand::Int(n) => Ok(Value::Int(*n)),
            Operand::Str(s) => Ok(Value::Str(s.clone())),
            Operand::Name(name) => self.frame(at)?.vars.get(name).cloned().ok_or_else(|| {
                RuntimeError::UndefinedSymbol {
                    at,
                    name: name.clone(),
                }
            }),
            Operand::RetVal => self
                .last_return
                .clone()
                .ok_or(RuntimeError::MissingReturnValue { at }),
            Operand::None => Err(invalid_operand(operand, at)),
        }
    }

    /// Bind a destination operand in the current frame.
    pub(crate) fn store(
        &mut self,
        dst: &Operand,
        value: Value,
        at: usize,
    ) -> Result<(), RuntimeError> {
        let name = dst.as_name().ok_or_else(|| invalid_operand(dst, at))?;
        self.frame_mut(at)?.vars.insert(name.to_string(), value);
        Ok(())
    }

    pub(crate) fn label_target(&self, operand: &Operand, at: usize) -> Result<usize, RuntimeError> {
        let label = operand.as_name().ok_or_else(|| invalid_operand(operand, at))?;
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at,
                label: label.to_string(),
            })
    }
}

pub(crate) fn invalid_operand(operand: &Operand, at: usize) -> RuntimeError {
    let operand = if operand.is_none() {
        "(empty)".to_string()
    } else {
        format!("'{operand}'")
    };
    RuntimeError::InvalidOperand { at, operand }
}

type Index = HashMap<String, usize>;

/// Single pass over the program recording every label and function entry.
fn scan(program: &Program) -> Result<(Index, Index), RuntimeError> {
    let mut labels = Index::new();
    let mut functions = Index::new();

    for (at, instr) in program.iter().enumerate() {
        let (index, duplicate): (&mut Index, fn(usize, String) -> RuntimeError) =
            match instr.opcode {
                Opcode::Label => (&mut labels, |at, label| RuntimeError::DuplicateLabel { at, label }),
                Opcode::FuncStart => (&mut functions, |at, name| {
                    RuntimeError::DuplicateFunction { at, name }
                }),
                _ => continue,
            };
        let name = instr
            .arg1
            .as_name()
            .ok_or_else(|| invalid_operand(&instr.arg1, at))?;
        if index.insert(name.to_string(), at).is_some() {
            return Err(duplicate(at, name.to_string()));
        }
    }

    Ok((labels, functions))
}
