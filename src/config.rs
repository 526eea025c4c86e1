//! Per-run file layout configuration
//!
//! One `BootstrapConfig` is built from the CLI flags and threaded through
//! the run, so no module holds path state of its own.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File layout for one bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    workdir: PathBuf,
    descriptor_file: String,
    env_file: String,
}

impl BootstrapConfig {
    /// Create a configuration rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>, descriptor_file: &str, env_file: &str) -> Self {
        Self {
            workdir: workdir.into(),
            descriptor_file: descriptor_file.to_owned(),
            env_file: env_file.to_owned(),
        }
    }

    /// The working directory for this run
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Path of the compose descriptor inside the workdir
    pub fn descriptor_path(&self) -> PathBuf {
        self.workdir.join(&self.descriptor_file)
    }

    /// Path of the environment file inside the workdir
    pub fn env_path(&self) -> PathBuf {
        self.workdir.join(&self.env_file)
    }

    /// Path of an arbitrary file inside the workdir
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.workdir.join(file)
    }

    /// Create the working directory if it does not exist
    pub fn ensure_workdir(&self) -> Result<()> {
        if !self.workdir.is_dir() {
            fs::create_dir_all(&self.workdir)?;
        }
        Ok(())
    }

    /// Create the named subdirectories under the workdir, skipping existing ones
    pub fn ensure_subdirs(&self, names: &[&str]) -> Result<()> {
        for name in names {
            let path = self.workdir.join(name);
            if !path.is_dir() {
                fs::create_dir_all(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_workdir_creates_missing_directory() {
        let temp = tempdir().unwrap();
        let config = BootstrapConfig::new(temp.path().join("stack"), "docker-compose.yaml", ".env");

        config.ensure_workdir().unwrap();
        assert!(config.workdir().is_dir());

        // Second call is a no-op
        config.ensure_workdir().unwrap();
    }

    #[test]
    fn test_ensure_subdirs() {
        let temp = tempdir().unwrap();
        let config = BootstrapConfig::new(temp.path(), "docker-compose.yaml", ".env");

        config.ensure_subdirs(&["dags", "logs", "plugins"]).unwrap();
        for name in ["dags", "logs", "plugins"] {
            assert!(temp.path().join(name).is_dir());
        }

        config.ensure_subdirs(&["dags", "logs", "plugins"]).unwrap();
    }

    #[test]
    fn test_paths_join_workdir() {
        let config = BootstrapConfig::new("/srv/airflow", "docker-compose.yaml", ".env");
        assert_eq!(
            config.descriptor_path(),
            PathBuf::from("/srv/airflow/docker-compose.yaml")
        );
        assert_eq!(config.env_path(), PathBuf::from("/srv/airflow/.env"));
        assert_eq!(
            config.path_of("env.default"),
            PathBuf::from("/srv/airflow/env.default")
        );
    }
}
