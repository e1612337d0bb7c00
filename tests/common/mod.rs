//! # sqltest test support
//!
//! A scripted in-memory [`Transaction`] standing in for a database driver.

#![allow(dead_code)]

use std::collections::HashMap;

use sqltest::{Rows, Transaction, TxError};

/// What the fake database answers for one SQL text.
#[derive(Debug, Clone)]
pub enum Response {
    Rows(Vec<String>),
    Error(String),
}

/// Records every statement it sees and answers from a script.
///
/// Statements without a scripted response succeed with no rows.
#[derive(Debug, Default)]
pub struct FakeTx {
    script: HashMap<String, Response>,
    pub seen: Vec<String>,
}

impl FakeTx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, sql: &str, rows: &[&str]) -> Self {
        let rows = rows.iter().map(|r| r.to_string()).collect();
        self.script.insert(sql.to_string(), Response::Rows(rows));
        self
    }

    pub fn fails(mut self, sql: &str, message: &str) -> Self {
        self.script
            .insert(sql.to_string(), Response::Error(message.to_string()));
        self
    }

    fn answer(&mut self, sql: &str) -> Result<Vec<String>, TxError> {
        self.seen.push(sql.to_string());
        match self.script.get(sql) {
            Some(Response::Rows(rows)) => Ok(rows.clone()),
            Some(Response::Error(message)) => Err(message.clone().into()),
            None => Ok(Vec::new()),
        }
    }
}

impl Transaction for FakeTx {
    fn exec(&mut self, sql: &str) -> Result<(), TxError> {
        self.answer(sql).map(|_| ())
    }

    fn query(&mut self, sql: &str) -> Result<Rows<'_>, TxError> {
        let rows = self.answer(sql)?;
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}
