//! Runtime actions and the transaction capability they run against.
//!
//! Every recorded statement of a test carries one [`Action`]. Actions are
//! created at parse time, never mutated, and only need a [`Transaction`] to
//! perform their check.

use tracing::trace;

use crate::errors::{ActionError, TxError};

/// Rows yielded by [`Transaction::query`], each already rendered as text.
///
/// The iterator ending signals the end of rows; an `Err` item reports a
/// failure while reading.
pub type Rows<'a> = Box<dyn Iterator<Item = Result<String, TxError>> + 'a>;

/// The database capability a test runs against.
///
/// Implementations wrap a driver transaction. The engine never begins, commits
/// or rolls back anything itself.
pub trait Transaction {
    /// Executes `sql`, discarding any result rows.
    fn exec(&mut self, sql: &str) -> Result<(), TxError>;

    /// Executes `sql` and yields its rows as strings.
    fn query(&mut self, sql: &str) -> Result<Rows<'_>, TxError>;
}

impl<T: Transaction + ?Sized> Transaction for &mut T {
    fn exec(&mut self, sql: &str) -> Result<(), TxError> {
        (**self).exec(sql)
    }

    fn query(&mut self, sql: &str) -> Result<Rows<'_>, TxError> {
        (**self).query(sql)
    }
}

impl<T: Transaction + ?Sized> Transaction for Box<T> {
    fn exec(&mut self, sql: &str) -> Result<(), TxError> {
        (**self).exec(sql)
    }

    fn query(&mut self, sql: &str) -> Result<Rows<'_>, TxError> {
        (**self).query(sql)
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// The runtime behavior attached to a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the statement and ignore its result.
    Exec(ExecAction),
    /// Run a defined query and compare its rows with expected text.
    Assert(AssertAction),
    /// Run a statement that must fail with a given message.
    Except(ExceptAction),
}

impl Action {
    /// Short name of the variant, used in listings and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Exec(_) => "exec",
            Action::Assert(_) => "assert",
            Action::Except(_) => "except",
        }
    }

    pub fn run(&self, tx: &mut dyn Transaction) -> Result<(), ActionError> {
        match self {
            Action::Exec(action) => action.run(tx),
            Action::Assert(action) => action.run(tx),
            Action::Except(action) => action.run(tx),
        }
    }
}

/// Plain statement, sent verbatim including any leading comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecAction {
    pub sql: String,
}

impl ExecAction {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    fn run(&self, tx: &mut dyn Transaction) -> Result<(), ActionError> {
        trace!(target: "sqltest::run", sql = %self.sql, "exec");
        tx.exec(&self.sql).map_err(ActionError::Exec)
    }
}

/// `assert <key> <expected>` resolved against the defined query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertAction {
    pub key: String,
    /// Query text stored by the matching `define`.
    pub query: String,
    pub expected: String,
}

impl AssertAction {
    /// Rows are joined with a single space and compared byte for byte.
    fn run(&self, tx: &mut dyn Transaction) -> Result<(), ActionError> {
        trace!(target: "sqltest::run", key = %self.key, query = %self.query, "assert");
        let rows = tx.query(&self.query).map_err(ActionError::Query)?;
        let mut values = Vec::new();
        for row in rows {
            values.push(row.map_err(ActionError::Row)?);
        }
        let actual = values.join(" ");
        if actual != self.expected {
            return Err(ActionError::AssertMismatch {
                actual,
                expected: self.expected.clone(),
            });
        }
        Ok(())
    }
}

/// `except <substring>` followed by a statement that must fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptAction {
    pub query: String,
    /// Case-sensitive fragment the failure message must contain.
    pub substring: String,
}

impl ExceptAction {
    fn run(&self, tx: &mut dyn Transaction) -> Result<(), ActionError> {
        trace!(target: "sqltest::run", query = %self.query, expected = %self.substring, "except");
        match tx.exec(&self.query) {
            Err(err) => {
                let message = err.to_string();
                if message.contains(&self.substring) {
                    Ok(())
                } else {
                    Err(ActionError::ExceptMismatch {
                        expected: self.substring.clone(),
                        actual: message,
                    })
                }
            }
            // A statement that succeeds is a failed expectation.
            Ok(()) => Err(ActionError::ExceptSucceeded {
                expected: self.substring.clone(),
            }),
        }
    }
}
