//! Diagnostics for every phase of Quill.
//!
//! - Error codes for searchability
//! - A message saying what went wrong
//! - A primary position saying where
//! - Optional secondary labels and notes
//!
//! Phases build a [`Diagnostic`] from their own error types; the
//! [`emitter`] renders it against the source text.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{ErrorCode, Phase};
