//! # sqltest
//!
//! Declarative SQL fixture tests. A fixture is plain SQL split into statements
//! at a `;` that ends a line, with three directives mixed in:
//!
//! ```sql
//! CREATE TABLE t (id INT);
//! INSERT INTO t VALUES (1);
//!
//! define COUNT
//! SELECT count(*) FROM t;
//!
//! assert COUNT 1;
//!
//! except duplicate key
//! INSERT INTO t VALUES (1);
//! ```
//!
//! Fixtures are built into [`Test`]s once and run against any
//! [`Transaction`]; the crate ships no database driver.

pub mod action;
pub mod cli;
pub mod context;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod fixture;
pub mod interpreters;
pub mod position;
pub mod scanner;
pub mod set;

pub use crate::action::{Action, Rows, Transaction};
pub use crate::context::ParseContext;
pub use crate::engine::ParseConfig;
pub use crate::errors::{ActionError, BuildError, RunError, SetError, SyntaxError, TxError};
pub use crate::fixture::{Statement, Test};
pub use crate::position::Position;
pub use crate::set::Set;
