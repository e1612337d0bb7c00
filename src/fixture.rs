//! Built tests and their statements.
//!
//! A [`Test`] is the immutable result of building one fixture: the statements
//! that carry runtime actions, in source order, plus the final parse context.
//! Running it sends each action to a caller-supplied [`Transaction`] and stops
//! at the first failure.

use std::{borrow::Cow, io::Read};

use tracing::{debug, warn};

use crate::{
    action::{Action, Transaction},
    context::ParseContext,
    engine::{self, ParseConfig},
    errors::{BuildError, RunError},
    position::Position,
};

/// Name used in diagnostics when a fixture is built without one.
pub const UNNAMED: &str = "<fixture>";

/// One recorded statement of a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    left: Position,
    right: Position,
    source: Vec<u8>,
    action: Action,
}

impl Statement {
    pub(crate) fn new(left: Position, right: Position, source: &[u8], action: Action) -> Self {
        Self {
            left,
            right,
            source: source.to_vec(),
            action,
        }
    }

    /// Absolute position of the first byte.
    pub fn left(&self) -> Position {
        self.left
    }

    /// Absolute position one past the last byte.
    pub fn right(&self) -> Position {
        self.right
    }

    /// Verbatim statement bytes, leading comments included.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn source_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.source)
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// A built fixture, ready to run.
#[derive(Debug, Clone)]
pub struct Test {
    name: String,
    context: ParseContext,
    statements: Vec<Statement>,
}

impl Test {
    /// Builds a test from in-memory fixture bytes.
    pub fn parse(source: &[u8], config: &ParseConfig) -> Result<Self, BuildError> {
        Self::parse_named(UNNAMED, source, config)
    }

    /// Builds a test, using `name` in diagnostics.
    pub fn parse_named(
        name: impl Into<String>,
        source: &[u8],
        config: &ParseConfig,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        let (context, statements) = engine::build(&name, source, config)?;
        Ok(Self {
            name,
            context,
            statements,
        })
    }

    /// Reads `reader` to the end, then builds.
    pub fn from_reader<R: Read>(reader: R, config: &ParseConfig) -> Result<Self, BuildError> {
        Self::from_named_reader(UNNAMED, reader, config)
    }

    pub fn from_named_reader<R: Read>(
        name: impl Into<String>,
        mut reader: R,
        config: &ParseConfig,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        let mut bytes = Vec::new();
        if let Err(source) = reader.read_to_end(&mut bytes) {
            return Err(BuildError::Io { name, source });
        }
        Self::parse_named(name, &bytes, config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The context accumulated by `define` statements.
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Runs every statement in order, stopping at the first failure.
    pub fn run(&self, tx: &mut dyn Transaction) -> Result<(), RunError> {
        debug!(target: "sqltest::run", test = %self.name, statements = self.statements.len(), "running test");
        for statement in &self.statements {
            if let Err(source) = statement.action.run(tx) {
                warn!(
                    target: "sqltest::run",
                    test = %self.name,
                    line = statement.left.display_line(),
                    error = %source,
                    "statement failed"
                );
                return Err(RunError {
                    left: statement.left,
                    right: statement.right,
                    statement: statement.source_text().into_owned(),
                    source,
                });
            }
        }
        Ok(())
    }
}
