//! Error types for stackboot

use thiserror::Error;

/// Result type for stackboot operations
pub type Result<T> = std::result::Result<T, StackbootError>;

/// Stackboot error types
#[derive(Error, Debug)]
pub enum StackbootError {
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    #[error("Secret access denied: {0}")]
    SecretAccessDenied(String),

    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("Missing secret field: {0}")]
    MissingSecretField(String),

    #[error("Orchestration command failed: {command}: {stderr}")]
    OrchestrationCommandFailed { command: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}
