use tracing::debug;

use super::{text, trim_blank, Interpreter, Outcome};
use crate::{
    action::{Action, AssertAction},
    context::ParseContext,
    errors::SyntaxError,
};

const KEYWORD: &[u8] = b"assert ";

/// `assert <key> <expected>`: compares the rows of a defined query.
///
/// The key runs up to the first space; everything after that space is the
/// expected text, kept as written. The key must have been defined earlier in
/// the same fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assert;

impl Interpreter for Assert {
    fn name(&self) -> &'static str {
        "assert"
    }

    fn interpret(&self, context: &ParseContext, probe: &[u8]) -> Result<Outcome, SyntaxError> {
        let Some(rest) = probe.strip_prefix(KEYWORD) else {
            return Ok(Outcome::NotMatched);
        };
        let rest = trim_blank(rest);
        if rest.is_empty() {
            return Err(SyntaxError::AssertMissingKey);
        }
        let space = rest
            .iter()
            .position(|&c| c == b' ')
            .ok_or(SyntaxError::AssertMissingValue)?;
        let expected = &rest[space + 1..];
        if expected.is_empty() {
            return Err(SyntaxError::AssertMissingValue);
        }
        let key = text(&rest[..space])?;
        let query = context
            .get(key)
            .ok_or_else(|| SyntaxError::AssertUndefined { key: key.to_string() })?;
        debug!(target: "sqltest::build", key = %key, "assert");
        Ok(Outcome::Action(Action::Assert(AssertAction {
            key: key.to_string(),
            query: query.to_string(),
            expected: text(expected)?.to_string(),
        })))
    }
}
