//! sqltest error handling.
//!
//! Errors are split by phase so callers can tell a malformed fixture apart
//! from a failing database run or an engine defect:
//!
//! - [`SyntaxError`]: a directive interpreter rejected a statement.
//! - [`BuildError`]: building a test from fixture bytes failed.
//! - [`ActionError`]: a single runtime check failed.
//! - [`RunError`]: an [`ActionError`] located in its fixture.
//! - [`SetError`]: building a named set of tests failed.
//!
//! All of them render through `miette`; build errors carry the fixture text and
//! a label over the offending statement.

use std::io;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::position::Position;

/// Error type produced by a [`Transaction`](crate::action::Transaction).
pub type TxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// PARSE TIME
// ============================================================================

/// A directive statement that does not follow its grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("missing newline after define statement")]
    #[diagnostic(
        code(sqltest::syntax::define_missing_newline),
        help("write the key on the first line and the query on the next: `define <key>\\n<query>`")
    )]
    DefineMissingNewline,

    #[error("missing key in define statement")]
    #[diagnostic(code(sqltest::syntax::define_missing_key))]
    DefineMissingKey,

    #[error("missing query in define statement")]
    #[diagnostic(code(sqltest::syntax::define_missing_query))]
    DefineMissingQuery,

    #[error("key {key:?} in define should not contain spaces")]
    #[diagnostic(code(sqltest::syntax::define_key_whitespace))]
    DefineKeyWhitespace { key: String },

    #[error("duplicate key {key:?} in define statement for test")]
    #[diagnostic(
        code(sqltest::syntax::define_duplicate),
        help("each key can be defined once per fixture")
    )]
    DefineDuplicate { key: String },

    #[error("missing key in assert statement")]
    #[diagnostic(code(sqltest::syntax::assert_missing_key))]
    AssertMissingKey,

    #[error("missing expected value in assert statement")]
    #[diagnostic(
        code(sqltest::syntax::assert_missing_value),
        help("write the expected rows after the key: `assert <key> <expected>`")
    )]
    AssertMissingValue,

    #[error("assert uses not defined key {key:?}")]
    #[diagnostic(
        code(sqltest::syntax::assert_undefined),
        help("define the key earlier in the same fixture")
    )]
    AssertUndefined { key: String },

    #[error("missing exception substring in except statement")]
    #[diagnostic(code(sqltest::syntax::except_missing_substring))]
    ExceptMissingSubstring,

    #[error("missing query in except statement")]
    #[diagnostic(
        code(sqltest::syntax::except_missing_query),
        help("write the failing query on the line after `except <substring>`")
    )]
    ExceptMissingQuery,

    /// `offset` counts bytes from the start of the decoded text.
    #[error("invalid UTF-8 at byte {offset} of statement")]
    #[diagnostic(
        code(sqltest::syntax::invalid_utf8),
        help("fixtures must be UTF-8; statement text is sent to the database unchanged")
    )]
    InvalidUtf8 { offset: usize },
}

/// Failure to turn fixture bytes into a [`Test`](crate::fixture::Test).
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("failed to read fixture {name}")]
    #[diagnostic(code(sqltest::build::io))]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "{name}: statement on lines {}:{} is invalid: {source}",
        .left.display_line(),
        .right.display_line()
    )]
    #[diagnostic(code(sqltest::build::syntax))]
    Syntax {
        name: String,
        left: Position,
        right: Position,
        #[source]
        #[diagnostic_source]
        source: SyntaxError,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this statement")]
        span: SourceSpan,
    },

    #[error("empty test: no runnable statements found in {name}")]
    #[diagnostic(
        code(sqltest::build::empty),
        help("a fixture needs at least one statement, assert or except")
    )]
    Empty { name: String },

    /// The parse loop ran out of iterations. This means the delimiter or an
    /// interpreter stopped making progress, never that the fixture is bad.
    #[error("internal error: parsing {name} exceeded the iteration limit of {limit} at byte {}", .position.index)]
    #[diagnostic(
        code(sqltest::internal::iteration_limit),
        help("raise the limit for very long fixtures; otherwise the delimiter or an interpreter made no progress, which is an engine bug")
    )]
    IterationLimit {
        name: String,
        limit: usize,
        position: Position,
    },
}

impl BuildError {
    /// True for engine defects rather than problems with the fixture.
    pub fn is_internal(&self) -> bool {
        matches!(self, BuildError::IterationLimit { .. })
    }

    /// The directive error behind a syntax failure.
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            BuildError::Syntax { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// RUN TIME
// ============================================================================

/// A single runtime check that did not hold.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Exec(): {0}")]
    Exec(#[source] TxError),

    #[error("Query(): {0}")]
    Query(#[source] TxError),

    #[error("reading row: {0}")]
    Row(#[source] TxError),

    #[error("defined query returns {actual:?}, want {expected:?}")]
    AssertMismatch { actual: String, expected: String },

    #[error("expected error contained {expected:?}, but got {actual:?}")]
    ExceptMismatch { expected: String, actual: String },

    #[error("expected an error containing {expected:?} but statement succeeded")]
    ExceptSucceeded { expected: String },
}

/// The first failing statement of a test run, with its location.
#[derive(Debug, Error, Diagnostic)]
#[error(
    "Query on lines {}:{} at bytes {}:{} fails: {source}.\nQuery source: {statement}",
    .left.display_line(),
    .right.display_line(),
    .left.index,
    .right.index
)]
#[diagnostic(code(sqltest::run::failed))]
pub struct RunError {
    pub left: Position,
    pub right: Position,
    pub statement: String,
    #[source]
    pub source: ActionError,
}

// ============================================================================
// SETS
// ============================================================================

/// Failure to assemble a [`Set`](crate::set::Set).
#[derive(Debug, Error, Diagnostic)]
pub enum SetError {
    #[error("test set is empty")]
    #[diagnostic(code(sqltest::set::empty))]
    Empty,

    #[error("test {name:?}: {source}")]
    #[diagnostic(code(sqltest::set::build))]
    Build {
        name: String,
        #[source]
        #[diagnostic_source]
        source: BuildError,
    },

    #[error("invalid glob pattern {pattern:?}: {message}")]
    #[diagnostic(code(sqltest::set::pattern))]
    Pattern { pattern: String, message: String },

    #[error("failed to walk {root}")]
    #[diagnostic(code(sqltest::set::walk))]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to open {name}")]
    #[diagnostic(code(sqltest::set::open))]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_error_names_lines_bytes_and_source() {
        let err = RunError {
            left: Position::new(3, 23),
            right: Position::new(3, 38),
            statement: "assert TEST [1]".into(),
            source: ActionError::AssertMismatch {
                actual: "1".into(),
                expected: "[1]".into(),
            },
        };
        let text = err.to_string();
        assert!(text.starts_with("Query on lines 4:4 at bytes 23:38 fails:"));
        assert!(text.contains(r#"defined query returns "1", want "[1]""#));
        assert!(text.ends_with("Query source: assert TEST [1]"));
    }

    #[test]
    fn iteration_limit_is_the_only_internal_error() {
        let limit = BuildError::IterationLimit {
            name: "f.sql".into(),
            limit: 5,
            position: Position::at(7),
        };
        assert!(limit.is_internal());
        assert!(!BuildError::Empty { name: "f.sql".into() }.is_internal());
    }

    #[test]
    fn syntax_build_errors_render_the_fixture() {
        let source = "define A\nSELECT 1;\ndefine A\nSELECT 2";
        let err = BuildError::Syntax {
            name: "dup.sql".into(),
            left: Position::new(2, 19),
            right: Position::new(3, 36),
            source: SyntaxError::DefineDuplicate { key: "A".into() },
            src: NamedSource::new("dup.sql", source.to_string()),
            span: (19..36).into(),
        };
        assert_eq!(
            err.syntax(),
            Some(&SyntaxError::DefineDuplicate { key: "A".into() })
        );
        let report = format!("{:?}", miette::Report::new(err));
        assert!(report.contains("dup.sql"));
        assert!(report.contains("in this statement"));
    }
}
