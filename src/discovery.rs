use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::SetError;

/// Pattern used when no other is given.
pub const DEFAULT_PATTERN: &str = "testdata/*.sql";

/// Resolves glob patterns to fixture files.
///
/// Supported syntax: `*` and `?` within one path component, `[...]` character
/// classes (`[!...]` negates) and `**` for any number of directories. The
/// literal directory prefix of the pattern is walked; everything after it is
/// matched against paths relative to that prefix.
#[derive(Debug)]
pub struct FixtureDiscoverer;

impl FixtureDiscoverer {
    // =====================
    // Public API
    // =====================

    /// Returns every file matching `pattern`, sorted for deterministic order.
    ///
    /// A pattern that matches nothing, including one whose directory does not
    /// exist, yields an empty list.
    pub fn discover(pattern: &str) -> Result<Vec<PathBuf>, SetError> {
        let (root, glob) = Self::split_pattern(pattern);
        if glob.is_empty() {
            let path = PathBuf::from(pattern);
            return Ok(if path.is_file() { vec![path] } else { Vec::new() });
        }
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let matcher = Self::compile(pattern, &glob)?;
        let mut walker = WalkDir::new(&root).min_depth(1);
        if !glob.iter().any(|c| *c == "**") {
            walker = walker.max_depth(glob.len());
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| SetError::Walk {
                root: root.display().to_string(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            if !matcher.is_match(&Self::slash_path(relative)) {
                continue;
            }
            files.push(Self::display_path(&root, relative, entry.path()));
        }
        files.sort();
        debug!(target: "sqltest::set", pattern, matched = files.len(), "discovered fixtures");
        Ok(files)
    }

    // =====================
    // Internal - Pattern Handling
    // =====================

    /// Splits a pattern into its literal directory prefix and the glob
    /// components that follow.
    fn split_pattern(pattern: &str) -> (PathBuf, Vec<&str>) {
        let components: Vec<&str> = pattern.split('/').collect();
        let literal = components
            .iter()
            .take_while(|c| !Self::has_magic(c))
            .count();
        if literal == components.len() {
            return (PathBuf::from(pattern), Vec::new());
        }
        let prefix = components[..literal].join("/");
        let root = match prefix.as_str() {
            "" if pattern.starts_with('/') => PathBuf::from("/"),
            "" => PathBuf::from("."),
            _ => PathBuf::from(prefix),
        };
        (root, components[literal..].to_vec())
    }

    fn has_magic(component: &str) -> bool {
        component.contains(['*', '?', '['])
    }

    /// Translates glob components into an anchored regex over `/`-separated
    /// relative paths.
    fn compile(pattern: &str, glob: &[&str]) -> Result<Regex, SetError> {
        let invalid = |message: String| SetError::Pattern {
            pattern: pattern.to_string(),
            message,
        };
        let mut re = String::from("^");
        for (i, component) in glob.iter().enumerate() {
            let last = i + 1 == glob.len();
            if *component == "**" {
                re.push_str(if last { ".*" } else { "(?:[^/]+/)*" });
                continue;
            }
            re.push_str(&Self::translate(component).map_err(invalid)?);
            if !last {
                re.push('/');
            }
        }
        re.push('$');
        Regex::new(&re).map_err(|e| invalid(e.to_string()))
    }

    fn translate(component: &str) -> Result<String, String> {
        let mut out = String::new();
        let mut chars = component.chars();
        while let Some(c) = chars.next() {
            match c {
                '*' => out.push_str("[^/]*"),
                '?' => out.push_str("[^/]"),
                '[' => {
                    out.push('[');
                    let mut first = true;
                    loop {
                        match chars.next() {
                            Some(']') if !first => break,
                            Some('!') if first => out.push('^'),
                            Some(c @ ('\\' | '[' | ']' | '^' | '&' | '~' | '-')) => {
                                if c == '-' && !first {
                                    out.push('-');
                                } else {
                                    out.push('\\');
                                    out.push(c);
                                }
                            }
                            Some(c) => out.push(c),
                            None => return Err("unterminated character class".into()),
                        }
                        first = false;
                    }
                    out.push(']');
                }
                c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        Ok(out)
    }

    // =====================
    // Internal - Path Utilities
    // =====================

    fn slash_path(relative: &Path) -> String {
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Matches under an implicit `.` root are reported without a `./` prefix.
    fn display_path(root: &Path, relative: &Path, full: &Path) -> PathBuf {
        if root == Path::new(".") {
            relative.to_path_buf()
        } else {
            full.to_path_buf()
        }
    }
}
