//! Evaluation limits.

/// Iterations a single loop may run before evaluation is aborted.
pub const DEFAULT_LOOP_LIMIT: usize = 8192;

/// Nested calls allowed before a `RangeError` is raised.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EvalConfig {
    /// Iteration ceiling for every loop form. Also the largest index an
    /// array assignment may grow to.
    pub loop_limit: usize,
    pub max_call_depth: usize,
}

impl EvalConfig {
    #[must_use]
    pub fn loop_limit(mut self, limit: usize) -> Self {
        self.loop_limit = limit;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            loop_limit: DEFAULT_LOOP_LIMIT,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
