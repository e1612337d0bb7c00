//! Directive interpreters.
//!
//! Each statement of a fixture (with any leading comment stripped) is offered
//! to an ordered list of interpreters. The first one that does not answer
//! [`Outcome::NotMatched`] decides what the statement means. A statement no
//! interpreter claims becomes a plain exec action.
//!
//! ## Interpreters Provided
//!
//! - [`Define`]: `define <key>\n<query>` binds a query in the context.
//! - [`Assert`]: `assert <key> <expected>` checks the rows of a defined query.
//! - [`Except`]: `except <substring>\n<query>` expects a failing statement.

use std::{fmt, sync::Arc};

use crate::{action::Action, context::ParseContext, errors::SyntaxError};

mod assert;
mod define;
mod except;

pub use assert::Assert;
pub use define::Define;
pub use except::Except;

/// What an interpreter made of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not this interpreter's syntax; try the next one.
    NotMatched,
    /// The statement extends the context and records no action.
    Context(ParseContext),
    /// The statement becomes a runtime action.
    Action(Action),
}

/// A pluggable statement interpreter.
///
/// `probe` is the statement text without leading comments and without its
/// terminating `;`. Returning an error aborts the whole build.
pub trait Interpreter: fmt::Debug + Send + Sync {
    /// Directive keyword, used in logs.
    fn name(&self) -> &'static str;

    fn interpret(&self, context: &ParseContext, probe: &[u8]) -> Result<Outcome, SyntaxError>;
}

/// The built-in chain: define, assert, except.
pub fn default_interpreters() -> Vec<Arc<dyn Interpreter>> {
    vec![Arc::new(Define), Arc::new(Assert), Arc::new(Except)]
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Trims spaces and tabs from both ends.
fn trim_blank(bytes: &[u8]) -> &[u8] {
    let is_blank = |c: &u8| *c == b' ' || *c == b'\t';
    let start = bytes.iter().position(|c| !is_blank(c)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|c| !is_blank(c)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Decodes directive text. Bytes are never replaced, so two different keys
/// can not decode to the same string.
fn text(bytes: &[u8]) -> Result<&str, SyntaxError> {
    std::str::from_utf8(bytes).map_err(|err| SyntaxError::InvalidUtf8 {
        offset: err.valid_up_to(),
    })
}

fn find_newline(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&c| c == b'\n')
}
