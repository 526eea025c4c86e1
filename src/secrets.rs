//! Secret store access
//!
//! Credentials are fetched per run, held only in memory, and never
//! written to disk verbatim; only derived values (connection URLs)
//! reach the descriptor or env file.

use crate::error::{Result, StackbootError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Flat credential mapping fetched for one run
pub type SecretBundle = HashMap<String, String>;

/// Remote secret store contract
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the named secret from the given region
    async fn fetch(&self, name: &str, region: &str) -> Result<SecretBundle>;
}

/// AWS Secrets Manager backend
#[derive(Debug, Default)]
pub struct AwsSecretStore;

impl AwsSecretStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn fetch(&self, name: &str, region: &str) -> Result<SecretBundle> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_owned()))
            .load()
            .await;
        let client = aws_sdk_secretsmanager::Client::new(&config);

        let response = client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|err| {
                let service_error = err.into_service_error();
                if service_error.is_resource_not_found_exception() {
                    StackbootError::SecretNotFound(name.to_owned())
                } else {
                    StackbootError::SecretAccessDenied(service_error.to_string())
                }
            })?;

        let payload = response.secret_string().ok_or_else(|| {
            StackbootError::SecretAccessDenied(format!("{name}: secret has no string payload"))
        })?;
        decode_bundle(name, payload)
    }
}

/// Decode a secret payload (a JSON object) into a flat string mapping.
/// Non-string values are stringified.
fn decode_bundle(name: &str, payload: &str) -> Result<SecretBundle> {
    let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(payload)
        .map_err(|e| {
            StackbootError::SecretAccessDenied(format!(
                "{name}: secret payload is not a JSON object: {e}"
            ))
        })?;

    Ok(fields
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

/// Fixed-content store for tests
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, SecretBundle>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: &str, bundle: SecretBundle) -> Self {
        self.secrets.insert(name.to_owned(), bundle);
        self
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn fetch(&self, name: &str, _region: &str) -> Result<SecretBundle> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| StackbootError::SecretNotFound(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bundle_stringifies_values() {
        let bundle =
            decode_bundle("Test/Secret", r#"{"host": "db.internal", "port": 5432}"#).unwrap();
        assert_eq!(bundle.get("host").map(String::as_str), Some("db.internal"));
        assert_eq!(bundle.get("port").map(String::as_str), Some("5432"));
    }

    #[test]
    fn test_decode_bundle_rejects_non_object() {
        let result = decode_bundle("Test/Secret", "just a string");
        assert!(matches!(result, Err(StackbootError::SecretAccessDenied(_))));
    }

    #[tokio::test]
    async fn test_memory_store_fetch() {
        let store = MemorySecretStore::new().with_secret(
            "Airflow/Database",
            HashMap::from([("DB_USER".to_owned(), "airflow".to_owned())]),
        );

        let bundle = store.fetch("Airflow/Database", "eu-west-1").await.unwrap();
        assert_eq!(bundle.get("DB_USER").map(String::as_str), Some("airflow"));

        let missing = store.fetch("Airflow/Missing", "eu-west-1").await;
        assert!(matches!(missing, Err(StackbootError::SecretNotFound(_))));
    }
}
