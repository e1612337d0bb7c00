//! The fixture-scoped parse context.
//!
//! A [`ParseContext`] maps keys introduced by `define` to the query text stored
//! under them. Interpreters receive it read-only and hand back an extended copy;
//! the persistent map from `im` keeps those copies cheap. Once a test is built
//! the context is frozen and shared by every action of that test.

use im::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    defines: HashMap<String, String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new context with `key` bound to `query`, or `None` if the key
    /// is already bound.
    pub fn with_define(&self, key: impl Into<String>, query: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if self.defines.contains_key(&key) {
            return None;
        }
        Some(Self {
            defines: self.defines.update(key, query.into()),
        })
    }

    /// Query text stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.defines.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defines.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Iterates `(key, query)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
