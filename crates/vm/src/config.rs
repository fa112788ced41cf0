//! Execution limits.

/// Default maximum number of simultaneously active frames, `main` included.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Limits applied while a program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Frames allowed on the call stack before `CallDepthExceeded`.
    pub max_call_depth: usize,
    /// Instructions allowed before `StepLimitExceeded`. `None` runs forever.
    pub max_steps: Option<u64>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: MAX_CALL_DEPTH,
            max_steps: None,
        }
    }
}

impl VmConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_steps(mut self, steps: Option<u64>) -> Self {
        self.max_steps = steps;
        self
    }
}
