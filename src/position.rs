//! Source positions inside a fixture.
//!
//! Every scanner routine reports where it stopped as a [`Position`] relative to
//! the slice it was handed. The build engine adds those relative positions to
//! its running cursor to obtain absolute locations for diagnostics.

use std::ops::{Add, AddAssign};

use miette::SourceSpan;

/// A zero-based line count paired with a byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub index: usize,
}

impl Position {
    pub const fn new(line: usize, index: usize) -> Self {
        Self { line, index }
    }

    /// A position on the first line at byte `index`.
    pub const fn at(index: usize) -> Self {
        Self { line: 0, index }
    }

    /// One-based line number, as shown to humans.
    pub const fn display_line(&self) -> usize {
        self.line + 1
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position {
            line: self.line + rhs.line,
            index: self.index + rhs.index,
        }
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        *self = *self + rhs;
    }
}

/// Converts a `[left, right)` position pair into a miette span.
pub fn to_source_span(left: Position, right: Position) -> SourceSpan {
    SourceSpan::from(left.index..right.index.max(left.index))
}
