//! Compile-time constants and the per-run configuration

use crate::error::Result;
use serde_derive::Deserialize;
use std::{fs, path::Path};

/// Check the `requires!()` assertions at runtime (cheap).
pub const CHECK_PRECONDITIONS: bool = true;
/// Check the `invariant!()` assertions at runtime (cheap).
pub const CHECK_INVARIANTS: bool = true;

/// Line prefixes that are treated as comments unless configured otherwise.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["c", "%"];

/// Settings for one hashing run.
///
/// The same value may be shared by many runs; it is never modified once
/// a run has started.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lines starting with one of these words are skipped.
    #[serde(rename = "ignore")]
    pub ignore_patterns: Vec<String>,
    /// Validate literals and the clause count against the header.
    #[serde(rename = "header-check")]
    pub strict_header_check: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|&pattern| pattern.to_string())
                .collect(),
            strict_header_check: false,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Config> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Config> {
        Config::from_toml(&fs::read_to_string(path)?)
    }

    /// Add another comment prefix.
    pub fn ignore(mut self, pattern: impl Into<String>) -> Config {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Enable or disable validation against the header.
    pub fn header_check(mut self, enabled: bool) -> Config {
        self.strict_header_check = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_ignores_comments_and_percent() {
        let config = Config::default();
        assert_eq!(config.ignore_patterns, vec!["c", "%"]);
        assert!(!config.strict_header_check);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = Config::from_toml("header-check = true").unwrap();
        assert_eq!(config, Config::default().header_check(true));
    }

    #[test]
    fn ignore_list_replaces_defaults() {
        let config = Config::from_toml(r##"ignore = ["x", "#"]"##).unwrap();
        assert_eq!(config.ignore_patterns, vec!["x", "#"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("strict = true").is_err());
    }

    #[test]
    fn read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ignore = [\"c\"]\nheader-check = true").unwrap();
        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(
            config,
            Config {
                ignore_patterns: vec!["c".to_string()],
                strict_header_check: true,
            }
        );
    }
}
