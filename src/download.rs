//! Reference file download
//!
//! Fetches the upstream reference compose descriptor (and, for Airbyte,
//! the reference env file) over HTTP into the working directory.

use crate::error::{Result, StackbootError};
use std::path::Path;

/// Upstream reference compose file for an Airflow release
pub fn airflow_descriptor_url(version: &str) -> String {
    format!("https://airflow.apache.org/docs/apache-airflow/{version}/docker-compose.yaml")
}

/// Upstream reference compose file for an Airbyte ref
pub fn airbyte_descriptor_url(version: &str) -> String {
    format!("https://raw.githubusercontent.com/airbytehq/airbyte/{version}/docker-compose.yaml")
}

/// Upstream reference env file for an Airbyte ref
pub fn airbyte_env_url(version: &str) -> String {
    format!("https://raw.githubusercontent.com/airbytehq/airbyte/{version}/.env")
}

/// Download `url` to `path`, replacing any existing file
pub async fn fetch_to_file(client: &reqwest::Client, url: &str, path: &Path) -> Result<()> {
    tracing::info!("Downloading {} to {}", url, path.display());

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| StackbootError::Download(e.to_string()))?;

    if !response.status().is_success() {
        return Err(StackbootError::Download(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| StackbootError::Download(e.to_string()))?;
    std::fs::write(path, &body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airflow_descriptor_url() {
        assert_eq!(
            airflow_descriptor_url("2.4.3"),
            "https://airflow.apache.org/docs/apache-airflow/2.4.3/docker-compose.yaml"
        );
    }

    #[test]
    fn test_airbyte_urls() {
        assert_eq!(
            airbyte_descriptor_url("master"),
            "https://raw.githubusercontent.com/airbytehq/airbyte/master/docker-compose.yaml"
        );
        assert_eq!(
            airbyte_env_url("v0.40.0"),
            "https://raw.githubusercontent.com/airbytehq/airbyte/v0.40.0/.env"
        );
    }
}
