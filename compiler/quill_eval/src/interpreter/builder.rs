//! Interpreter construction.

use super::Interpreter;
use crate::config::EvalConfig;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// ```text
/// let interp = Interpreter::builder()
///     .loop_limit(100)
///     .print_handler(buffer_handler())
///     .build();
/// ```
pub struct InterpreterBuilder {
    config: EvalConfig,
    print_handler: Option<SharedPrintHandler>,
    stdlib: bool,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            config: EvalConfig::default(),
            print_handler: None,
            stdlib: true,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn loop_limit(mut self, limit: usize) -> Self {
        self.config = self.config.loop_limit(limit);
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.config = self.config.max_call_depth(depth);
        self
    }

    /// Where `print` and `console.log` write. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Install the built-in globals and methods (on by default).
    #[must_use]
    pub fn stdlib(mut self, enabled: bool) -> Self {
        self.stdlib = enabled;
        self
    }

    pub fn build(self) -> Interpreter {
        let print = self.print_handler.unwrap_or_else(stdout_handler);
        let mut interpreter = Interpreter::from_parts(self.config, print);
        if self.stdlib {
            crate::builtins::install(&mut interpreter);
        }
        interpreter
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
