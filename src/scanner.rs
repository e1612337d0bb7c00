//! Byte-level scanning primitives used by the build engine.
//!
//! The scanner never interprets SQL. It knows three things: which bytes are
//! blank between statements, where a leading comment ends, and where the next
//! statement ends. All functions work on raw bytes and return a [`Position`]
//! relative to the slice they were given.

use crate::position::Position;

/// Signature of a statement delimiter.
///
/// Given the remaining fixture bytes (with leading blanks already skipped),
/// returns the position one past the last byte of the next statement. A
/// zero-length result means the delimiter made no progress.
pub type Delimiter = fn(&[u8]) -> Position;

// ============================================================================
// BLANK SKIPPING
// ============================================================================

/// Skips newlines, spaces, tabs and bare `;` terminators.
///
/// Returns the position of the first other byte, or the end of input.
pub fn skip_blank(src: &[u8]) -> Position {
    let mut pos = Position::default();
    for (i, &c) in src.iter().enumerate() {
        match c {
            b'\n' => pos.line += 1,
            b' ' | b'\t' | b';' => {}
            _ => {
                pos.index = i;
                return pos;
            }
        }
    }
    pos.index = src.len();
    pos
}

// ============================================================================
// COMMENT SKIPPING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    /// Outside any comment.
    Code,
    /// Saw a `-` at the given index; a second `-` opens a line comment.
    Dash(usize),
    /// Saw a `/` at the given index; a `*` opens a block comment.
    Slash(usize),
    /// Inside `-- ...` up to the end of the line.
    Line,
    /// Inside `/* ... */`.
    Block,
    /// Inside a block comment right after a `*`.
    BlockStar,
}

/// Skips a run of leading `--` and `/* */` comments.
///
/// Newlines between and inside comments are consumed and counted. Any other
/// byte outside a comment stops the scan. A lone `-` or `/` that does not open
/// a comment is reported as the first non-comment byte. When the whole input
/// is comment the end of input is returned.
pub fn skip_leading_comment(src: &[u8]) -> Position {
    let mut line = 0;
    let mut state = CommentState::Code;
    for (i, &c) in src.iter().enumerate() {
        state = match state {
            CommentState::Code => match c {
                b'-' => CommentState::Dash(i),
                b'/' => CommentState::Slash(i),
                b'\n' => {
                    line += 1;
                    CommentState::Code
                }
                _ => return Position::new(line, i),
            },
            CommentState::Dash(start) => match c {
                b'-' => CommentState::Line,
                _ => return Position::new(line, start),
            },
            CommentState::Slash(start) => match c {
                b'*' => CommentState::Block,
                _ => return Position::new(line, start),
            },
            CommentState::Line => {
                if c == b'\n' {
                    line += 1;
                    CommentState::Code
                } else {
                    CommentState::Line
                }
            }
            CommentState::Block | CommentState::BlockStar => match c {
                b'/' if state == CommentState::BlockStar => CommentState::Code,
                b'*' => CommentState::BlockStar,
                b'\n' => {
                    line += 1;
                    CommentState::Block
                }
                _ => CommentState::Block,
            },
        };
    }
    match state {
        CommentState::Dash(start) | CommentState::Slash(start) => Position::new(line, start),
        _ => Position::new(line, src.len()),
    }
}

// ============================================================================
// STATEMENT DELIMITING
// ============================================================================

/// Default [`Delimiter`]: a statement ends at a `;` that is followed only by
/// spaces or tabs up to a newline or the end of input.
///
/// The returned index points at the `;` itself, so the terminator is not part
/// of the statement text; the next [`skip_blank`] consumes it. The line count
/// is the number of newlines crossed before the terminating line. Without any
/// qualifying `;` the statement runs to the end of input.
pub fn find_statement_end(src: &[u8]) -> Position {
    let mut pos = Position::at(src.len());
    let mut offset = 0;
    let mut rest = src;
    loop {
        let Some(nl) = rest.iter().position(|&c| c == b'\n') else {
            if let Some(i) = terminator_before(rest) {
                pos.index = offset + i;
            }
            return pos;
        };
        if let Some(i) = terminator_before(&rest[..nl]) {
            pos.index = offset + i;
            return pos;
        }
        pos.line += 1;
        offset += nl + 1;
        // A trailing newline at the very end: stop at the last boundary
        // instead of scanning past the input.
        if pos.index <= offset {
            return pos;
        }
        rest = &rest[nl + 1..];
    }
}

/// Index of a `;` that ends `line` once trailing spaces and tabs are ignored.
fn terminator_before(line: &[u8]) -> Option<usize> {
    for (i, &c) in line.iter().enumerate().rev() {
        match c {
            b' ' | b'\t' => {}
            b';' => return Some(i),
            _ => return None,
        }
    }
    None
}
