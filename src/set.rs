//! Named collections of independently built tests.

use std::{collections::BTreeMap, fs, io::Read};

use tracing::{debug, info};

use crate::{
    action::Transaction,
    discovery::{FixtureDiscoverer, DEFAULT_PATTERN},
    engine::ParseConfig,
    errors::{RunError, SetError},
    fixture::Test,
};

/// A non-empty mapping from name to [`Test`].
///
/// Sets are built atomically: if any input fails to build, no set is
/// returned. When two inputs share a name the later one replaces the earlier.
#[derive(Debug, Clone)]
pub struct Set {
    tests: BTreeMap<String, Test>,
}

impl Set {
    /// Builds a set from `(name, reader)` pairs, consuming the sequence once.
    pub fn from_sources<I, N, R>(sources: I, config: &ParseConfig) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: Read,
    {
        let mut tests = BTreeMap::new();
        for (name, reader) in sources {
            let name = name.into();
            let test = Test::from_named_reader(name.clone(), reader, config).map_err(|source| {
                SetError::Build {
                    name: name.clone(),
                    source,
                }
            })?;
            if tests.insert(name.clone(), test).is_some() {
                debug!(target: "sqltest::set", name = %name, "replacing test with the same name");
            }
        }
        if tests.is_empty() {
            return Err(SetError::Empty);
        }
        info!(target: "sqltest::set", tests = tests.len(), "test set built");
        Ok(Self { tests })
    }

    /// Builds a set from every file matching a glob `pattern`. Each test is
    /// named by its path.
    pub fn from_glob(pattern: &str, config: &ParseConfig) -> Result<Self, SetError> {
        let mut sources = Vec::new();
        for path in FixtureDiscoverer::discover(pattern)? {
            let name = path.display().to_string();
            let bytes = fs::read(&path).map_err(|source| SetError::Open {
                name: name.clone(),
                source,
            })?;
            sources.push((name, bytes));
        }
        Self::from_sources(
            sources.iter().map(|(name, bytes)| (name.as_str(), bytes.as_slice())),
            config,
        )
    }

    /// Builds a set from `testdata/*.sql`.
    pub fn default_files(config: &ParseConfig) -> Result<Self, SetError> {
        Self::from_glob(DEFAULT_PATTERN, config)
    }

    /// Iterates `(name, test)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Test)> {
        self.tests.iter().map(|(name, test)| (name.as_str(), test))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Test> {
        self.tests.get(name)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Always false for a built set; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Runs every test against its own transaction obtained from `open`.
    ///
    /// Tests do not affect each other: one failing test does not stop the
    /// others. Within a test the first failure still ends the run.
    pub fn run_each<T, F>(&self, mut open: F) -> BTreeMap<String, Result<(), RunError>>
    where
        T: Transaction,
        F: FnMut(&str) -> T,
    {
        self.iter()
            .map(|(name, test)| {
                let mut tx = open(name);
                (name.to_string(), test.run(&mut tx))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = (&'a str, &'a Test);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Test)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
