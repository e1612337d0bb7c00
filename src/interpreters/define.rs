use tracing::debug;

use super::{find_newline, text, trim_blank, Interpreter, Outcome};
use crate::{context::ParseContext, errors::SyntaxError};

const KEYWORD: &[u8] = b"define ";

/// `define <key>\n<query>`: stores `<query>` under `<key>` for later asserts.
///
/// The key is trimmed of spaces and tabs and must not contain any inside. The
/// query is everything after the first newline, verbatim. Defining a key twice
/// in one fixture is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Define;

impl Interpreter for Define {
    fn name(&self) -> &'static str {
        "define"
    }

    fn interpret(&self, context: &ParseContext, probe: &[u8]) -> Result<Outcome, SyntaxError> {
        let Some(rest) = probe.strip_prefix(KEYWORD) else {
            return Ok(Outcome::NotMatched);
        };
        let nl = find_newline(rest).ok_or(SyntaxError::DefineMissingNewline)?;
        let key = trim_blank(&rest[..nl]);
        if key.is_empty() {
            return Err(SyntaxError::DefineMissingKey);
        }
        let query = &rest[nl + 1..];
        if query.is_empty() {
            return Err(SyntaxError::DefineMissingQuery);
        }
        let key = text(key)?;
        if key.contains([' ', '\t']) {
            return Err(SyntaxError::DefineKeyWhitespace { key: key.to_string() });
        }
        let next = context
            .with_define(key, text(query)?)
            .ok_or_else(|| SyntaxError::DefineDuplicate { key: key.to_string() })?;
        debug!(target: "sqltest::build", key = %key, "define");
        Ok(Outcome::Context(next))
    }
}
