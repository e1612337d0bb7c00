//! Optional YAML settings for the CLI.
//!
//! ```yaml
//! pattern: "fixtures/**/*.sql"
//! limit: 500
//! ```
//!
//! Command-line flags override the file; the file overrides built-in defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::{discovery::DEFAULT_PATTERN, engine::ParseConfig};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sqltest.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub pattern: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(code(sqltest::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    #[diagnostic(code(sqltest::config::yaml))]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CliConfig {
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit`, or the default file when it exists, or nothing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml(&path, &text)
    }

    pub fn pattern<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.or(self.pattern.as_deref()).unwrap_or(DEFAULT_PATTERN)
    }

    pub fn parse_config(&self, flag: Option<usize>) -> ParseConfig {
        let config = ParseConfig::default();
        match flag.or(self.limit) {
            Some(limit) => config.with_limit(limit),
            None => config,
        }
    }
}
