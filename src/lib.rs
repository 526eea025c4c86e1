//! Stackboot - deployment bootstrap for self-hosted data stacks
//!
//! Stackboot provisions a workflow orchestration stack on a single host:
//! it fetches the upstream reference compose descriptor, pulls credentials
//! from a remote secret store, patches the descriptor (external database,
//! example workloads, image pinning), writes the environment file, and
//! drives the local `docker compose` CLI to bring the stack up.
//!
//! Two binaries share this library:
//!
//! - `airflow-bootstrap` for Apache Airflow
//! - `airbyte-bootstrap` for Airbyte

pub mod compose;
pub mod config;
pub mod download;
pub mod envfile;
pub mod error;
pub mod orchestrator;
pub mod secrets;

pub use error::{Result, StackbootError};
