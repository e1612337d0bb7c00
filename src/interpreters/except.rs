use tracing::debug;

use super::{find_newline, text, Interpreter, Outcome};
use crate::{
    action::{Action, ExceptAction},
    context::ParseContext,
    errors::SyntaxError,
};

const KEYWORD: &[u8] = b"except ";

/// `except <substring>\n<query>`: `<query>` must fail with a message that
/// contains `<substring>`. The substring is taken as written up to the newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Except;

impl Interpreter for Except {
    fn name(&self) -> &'static str {
        "except"
    }

    fn interpret(&self, _context: &ParseContext, probe: &[u8]) -> Result<Outcome, SyntaxError> {
        let Some(rest) = probe.strip_prefix(KEYWORD) else {
            return Ok(Outcome::NotMatched);
        };
        let nl = find_newline(rest).ok_or(SyntaxError::ExceptMissingQuery)?;
        if nl == 0 {
            return Err(SyntaxError::ExceptMissingSubstring);
        }
        let query = &rest[nl + 1..];
        if query.is_empty() {
            return Err(SyntaxError::ExceptMissingQuery);
        }
        let substring = text(&rest[..nl])?.to_string();
        debug!(target: "sqltest::build", substring = %substring, "except");
        Ok(Outcome::Action(Action::Except(ExceptAction {
            query: text(query)?.to_string(),
            substring,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn except(src: &str) -> Result<Outcome, SyntaxError> {
        Except.interpret(&ParseContext::new(), src.as_bytes())
    }

    #[test]
    fn malformed_excepts() {
        assert_eq!(except("except \nSELECT 1"), Err(SyntaxError::ExceptMissingSubstring));
        assert_eq!(except("except ERROR"), Err(SyntaxError::ExceptMissingQuery));
        assert_eq!(except("except ERROR\n"), Err(SyntaxError::ExceptMissingQuery));
    }

    #[test]
    fn builds_the_action() {
        assert_eq!(
            except("except ERROR\nSELECT 1"),
            Ok(Outcome::Action(Action::Except(ExceptAction {
                query: "SELECT 1".into(),
                substring: "ERROR".into(),
            })))
        );
    }

    #[test]
    fn substring_is_not_trimmed() {
        let Ok(Outcome::Action(Action::Except(action))) = except("except  divide by zero \nSELECT 1/0")
        else {
            panic!("expected an except action");
        };
        assert_eq!(action.substring, " divide by zero ");
        assert_eq!(action.query, "SELECT 1/0");
    }

    #[test]
    fn other_statements_are_not_matched() {
        assert_eq!(except(""), Ok(Outcome::NotMatched));
        assert_eq!(except("SELECT 1"), Ok(Outcome::NotMatched));
        assert_eq!(except("exception\nSELECT 1"), Ok(Outcome::NotMatched));
    }
}
