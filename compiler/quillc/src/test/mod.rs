//! Script test runner behind `quill test`.
//!
//! A test file is an ordinary script run with extra natives:
//!
//! - `assert(condition, message)`
//! - `assertEqual(actual, expected, message)` (strict equality)
//! - `assertError(body, message)`: `body()` must throw; when given,
//!   the error text must contain `message`
//! - `test(name, body)`: run `body` as a named case, recording a failure
//!   instead of stopping the file

mod discovery;

pub use assertions::{install_assertions, install_test_case, CaseLog};
pub use discovery::discover_tests;
pub use result::{FileSummary, TestOutcome, TestResult, TestSummary};
pub use runner::{TestRunner, TestRunnerConfig};

#[cfg(test)]
mod tests;
