//! Container-orchestration CLI driver
//!
//! Shells out to the local `docker` CLI in the working directory; the
//! compose file and env file are picked up from there by convention.
//! A non-zero exit status is surfaced as `OrchestrationCommandFailed`
//! rather than silently logged.

use crate::error::{Result, StackbootError};
use std::path::PathBuf;
use tokio::process::Command;

/// Captured output of one orchestration command
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Driver for the local `docker` CLI, bound to a working directory
#[derive(Debug)]
pub struct ComposeDriver {
    workdir: PathBuf,
}

impl ComposeDriver {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run `docker` with the given arguments, capturing output
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let rendered = format!("docker {}", args.join(" "));
        tracing::info!("Running {}", rendered);

        let output = Command::new("docker")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stdout.is_empty() {
            tracing::info!("{}", stdout.trim_end());
        }
        if !stderr.is_empty() {
            tracing::info!("{}", stderr.trim_end());
        }

        if !output.status.success() {
            return Err(StackbootError::OrchestrationCommandFailed {
                command: rendered,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    /// Start the whole stack in detached mode
    pub async fn up_detached(&self) -> Result<CommandOutput> {
        self.run(&["compose", "up", "-d"]).await
    }

    /// Start a single service in the foreground, waiting for it to exit
    pub async fn up_service(&self, service: &str) -> Result<CommandOutput> {
        self.run(&["compose", "up", service]).await
    }

    /// Stop and remove the stack
    pub async fn down(&self) -> Result<CommandOutput> {
        self.run(&["compose", "down"]).await
    }

    /// Remove all unused images
    pub async fn prune_images(&self) -> Result<CommandOutput> {
        self.run(&["image", "prune", "-a", "-f"]).await
    }

    /// Remove all stopped containers
    pub async fn prune_containers(&self) -> Result<CommandOutput> {
        self.run(&["container", "prune", "-f"]).await
    }
}
