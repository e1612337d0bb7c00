//! The build engine: fixture bytes in, ordered statements out.
//!
//! The engine drives the scanner and the interpreter chain over a whole
//! fixture:
//! 1. Skip blank lines and bare `;` terminators
//! 2. Find the end of the next statement with the configured delimiter
//! 3. Drop statements that are only comments
//! 4. Offer the statement (minus leading comments) to each interpreter
//! 5. Record an action, adopt a new context, or fall back to plain exec
//!
//! The loop is bounded by [`ParseConfig::limit`]. Running out of iterations
//! is reported as [`BuildError::IterationLimit`], which signals an engine
//! defect rather than a bad fixture.

use std::sync::Arc;

use miette::NamedSource;
use tracing::{debug, trace, warn};

use crate::{
    action::{Action, ExecAction},
    context::ParseContext,
    errors::{BuildError, SyntaxError},
    fixture::Statement,
    interpreters::{default_interpreters, Interpreter, Outcome},
    position::{to_source_span, Position},
    scanner::{find_statement_end, skip_blank, skip_leading_comment, Delimiter},
};

/// Default bound on parse loop iterations.
pub const DEFAULT_LIMIT: usize = 100;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// How a fixture is split and interpreted. Supplied once per build.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Maximum number of parse loop iterations for one fixture.
    pub limit: usize,
    pub delimiter: Delimiter,
    /// Tried in order; plain exec is the implicit last resort.
    pub interpreters: Vec<Arc<dyn Interpreter>>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            delimiter: find_statement_end,
            interpreters: default_interpreters(),
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the iteration limit. Zero keeps the default.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replaces the interpreter chain.
    pub fn with_interpreters(mut self, interpreters: Vec<Arc<dyn Interpreter>>) -> Self {
        self.interpreters = interpreters;
        self
    }

    /// Appends an interpreter after the existing ones.
    pub fn push_interpreter(mut self, interpreter: impl Interpreter + 'static) -> Self {
        self.interpreters.push(Arc::new(interpreter));
        self
    }
}

// ============================================================================
// BUILD LOOP
// ============================================================================

/// Parses `source` into its final context and statement list.
pub(crate) fn build(
    name: &str,
    source: &[u8],
    config: &ParseConfig,
) -> Result<(ParseContext, Vec<Statement>), BuildError> {
    let mut context = ParseContext::new();
    let mut statements = Vec::new();
    let mut rest = source;
    let mut cursor = Position::default();
    let mut budget = config.limit;

    debug!(target: "sqltest::build", fixture = name, bytes = source.len(), "building test");
    loop {
        let blank = skip_blank(rest);
        rest = &rest[blank.index..];
        cursor += blank;
        if rest.is_empty() {
            break;
        }

        if budget == 0 {
            warn!(target: "sqltest::build", fixture = name, limit = config.limit, "iteration limit reached");
            return Err(BuildError::IterationLimit {
                name: name.to_string(),
                limit: config.limit,
                position: cursor,
            });
        }
        budget -= 1;

        let end = (config.delimiter)(rest);
        if end.index == 0 {
            continue;
        }
        let len = end.index.min(rest.len());
        let text = &rest[..len];
        let left = cursor;
        let right = cursor + Position::new(end.line, len);
        rest = &rest[len..];
        cursor = right;

        let sql = std::str::from_utf8(text).map_err(|err| {
            let err = SyntaxError::InvalidUtf8 {
                offset: err.valid_up_to(),
            };
            syntax_error(name, source, left, right, err)
        })?;

        let comment = skip_leading_comment(text);
        if comment.index >= text.len() {
            trace!(target: "sqltest::build", line = left.display_line(), "skipping comment");
            continue;
        }
        let probe = &text[comment.index..];

        match interpret(config, &context, probe)
            .map_err(|err| syntax_error(name, source, left, right, err))?
        {
            Outcome::NotMatched => {
                trace!(target: "sqltest::build", line = left.display_line(), "exec");
                let action = Action::Exec(ExecAction::new(sql));
                statements.push(Statement::new(left, right, text, action));
            }
            Outcome::Context(next) => context = next,
            Outcome::Action(action) => statements.push(Statement::new(left, right, text, action)),
        }
    }

    if statements.is_empty() {
        return Err(BuildError::Empty {
            name: name.to_string(),
        });
    }
    debug!(
        target: "sqltest::build",
        fixture = name,
        statements = statements.len(),
        defines = context.len(),
        "test built"
    );
    Ok((context, statements))
}

/// Offers `probe` to each interpreter until one claims it.
fn interpret(
    config: &ParseConfig,
    context: &ParseContext,
    probe: &[u8],
) -> Result<Outcome, SyntaxError> {
    for interpreter in &config.interpreters {
        let outcome = interpreter.interpret(context, probe)?;
        if outcome != Outcome::NotMatched {
            return Ok(outcome);
        }
    }
    Ok(Outcome::NotMatched)
}

fn syntax_error(
    name: &str,
    source: &[u8],
    left: Position,
    right: Position,
    err: SyntaxError,
) -> BuildError {
    BuildError::Syntax {
        name: name.to_string(),
        left,
        right,
        source: err,
        src: NamedSource::new(name, String::from_utf8_lossy(source).into_owned()),
        span: to_source_span(left, right),
    }
}
