//! Handles all user-facing output for the CLI.
//!
//! Colored status lines go to stdout through `termcolor`; failures are
//! rendered as `miette` reports on stderr.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::fixture::{Statement, Test};

// ============================================================================
// CHECK OUTPUT
// ============================================================================

/// Prints one colored result line for a fixture.
pub fn print_fixture_status(name: &str, statements: Option<usize>) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (mark, color) = match statements {
        Some(_) => ("✓", Color::Green),
        None => ("✗", Color::Red),
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{mark}");
    let _ = stdout.reset();
    match statements {
        Some(count) => {
            let _ = writeln!(stdout, " {name} ({count} statements)");
        }
        None => {
            let _ = writeln!(stdout, " {name}");
        }
    }
}

/// Prints the closing summary of a `check` run.
pub fn print_summary(passed: usize, failed: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = writeln!(stdout);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{passed} passed, {failed} failed");
    let _ = stdout.reset();
}

/// Renders an error with its diagnostic code, labels and help on stderr.
pub fn print_report(error: impl miette::Diagnostic + Send + Sync + 'static) {
    eprintln!("{:?}", miette::Report::new(error));
}

// ============================================================================
// SHOW OUTPUT
// ============================================================================

/// Serializable view of one statement. Lines are 1-based, bytes 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    pub start_line: usize,
    pub end_line: usize,
    pub start_byte: usize,
    pub end_byte: usize,
    pub kind: &'static str,
    pub source: String,
}

impl From<&Statement> for StatementSummary {
    fn from(statement: &Statement) -> Self {
        Self {
            start_line: statement.left().display_line(),
            end_line: statement.right().display_line(),
            start_byte: statement.left().index,
            end_byte: statement.right().index,
            kind: statement.action().kind(),
            source: statement.source_text().into_owned(),
        }
    }
}

pub fn summarize(test: &Test) -> Vec<StatementSummary> {
    test.statements().iter().map(StatementSummary::from).collect()
}

/// Prints a human-readable statement listing.
pub fn print_statements(test: &Test) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for summary in summarize(test) {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(stdout, "{:<6}", summary.kind)?;
        stdout.reset()?;
        writeln!(
            stdout,
            " lines {}:{} bytes {}:{}",
            summary.start_line, summary.end_line, summary.start_byte, summary.end_byte
        )?;
        for line in summary.source.lines() {
            writeln!(stdout, "    {line}")?;
        }
    }
    Ok(())
}

pub fn print_statements_json(test: &Test) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(&summarize(test))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ParseConfig;

    #[test]
    fn summaries_use_one_based_lines() {
        let test = Test::parse(
            b"define TEST\nSELECT 1;\n\nassert TEST [1]",
            &ParseConfig::default(),
        )
        .unwrap();
        let summaries = summarize(&test);
        assert_eq!(
            summaries,
            vec![StatementSummary {
                start_line: 4,
                end_line: 4,
                start_byte: 23,
                end_byte: 38,
                kind: "assert",
                source: "assert TEST [1]".into(),
            }]
        );
    }

    #[test]
    fn summary_serializes_field_names() {
        let test = Test::parse(b"SELECT 1", &ParseConfig::default()).unwrap();
        let json = serde_json::to_value(summarize(&test)).unwrap();
        assert_eq!(json[0]["kind"], "exec");
        assert_eq!(json[0]["start_byte"], 0);
        assert_eq!(json[0]["end_byte"], 8);
        assert_eq!(json[0]["source"], "SELECT 1");
    }
}
