//! `KEY=VALUE` environment file handling
//!
//! The file is an unordered mapping; line order on disk is unspecified
//! and nothing may depend on it.

use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// In-memory contents of an environment file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvFile {
    values: HashMap<String, String>,
}

impl EnvFile {
    /// Create an empty environment file
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse an environment file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parse environment file text, skipping blank lines, comments, and
    /// lines without a `=` separator
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        for line in text.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.to_owned(), value.to_owned());
            }
        }
        Self { values }
    }

    /// Set a variable, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the file holds no variables
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write `KEY=VALUE` lines to `path`, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        let lines: Vec<String> = self
            .values
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        std::fs::write(path, lines.join("\n"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_skips_non_assignments() {
        let env = EnvFile::parse("FOO=bar\n\n# a comment\nnot an assignment\nBAZ=qux=quux\n");
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("FOO"), Some("bar"));
        // Only the first '=' splits
        assert_eq!(env.get("BAZ"), Some("qux=quux"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut env = EnvFile::new();
        env.set("KEY", "one");
        env.set("KEY", "two");
        assert_eq!(env.get("KEY"), Some("two"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_write_load_round_trip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".env");

        let mut env = EnvFile::new();
        env.set("AIRFLOW_UID", "1000");
        env.set("_PIP_ADDITIONAL_REQUIREMENTS", "apache-airflow-providers-amazon");
        env.write(&path).unwrap();

        // Order on disk is unspecified; compare as mappings
        let loaded = EnvFile::load(&path).unwrap();
        assert_eq!(loaded, env);
    }
}
