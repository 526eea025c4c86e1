//! Compose descriptor parser and serializer
//!
//! The descriptor is kept as a generic YAML document tree rather than a
//! typed model: the transformation passes only touch a handful of well
//! known keys and must leave everything else in the file untouched.
//!
//! Anchors, aliases, and `<<` merge keys are resolved into literal
//! duplicated content during parse. Serialized output therefore never
//! contains aliases, which downstream consumers of the written file do
//! not expand.

use crate::error::{Result, StackbootError};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// A parsed compose descriptor, alias-free after [`parse_str`]
pub type Descriptor = Value;

/// Parse a descriptor from text, resolving aliases and merge keys
pub fn parse_str(text: &str) -> Result<Descriptor> {
    let mut doc: Value = serde_yaml::from_str(text)
        .map_err(|e| StackbootError::MalformedDescriptor(format!("invalid YAML: {e}")))?;
    doc.apply_merge()
        .map_err(|e| StackbootError::MalformedDescriptor(format!("unresolvable merge key: {e}")))?;
    if !doc.is_mapping() {
        return Err(StackbootError::MalformedDescriptor(
            "top level is not a mapping".to_owned(),
        ));
    }
    Ok(doc)
}

/// Parse a descriptor file from disk
pub fn parse_file(path: &Path) -> Result<Descriptor> {
    let text = std::fs::read_to_string(path)?;
    parse_str(&text)
}

/// Serialize a descriptor back to YAML text
pub fn serialize(doc: &Descriptor) -> Result<String> {
    serde_yaml::to_string(doc).map_err(|e| StackbootError::Yaml(e.to_string()))
}

/// Serialize a descriptor and replace the file at `path`
pub fn write_file(doc: &Descriptor, path: &Path) -> Result<()> {
    std::fs::write(path, serialize(doc)?)?;
    Ok(())
}

/// The `services` mapping of a descriptor
pub fn services(doc: &Descriptor) -> Result<&Mapping> {
    doc.get("services")
        .and_then(Value::as_mapping)
        .ok_or_else(|| StackbootError::MalformedDescriptor("missing 'services' mapping".to_owned()))
}

/// Mutable access to the `services` mapping of a descriptor
pub fn services_mut(doc: &mut Descriptor) -> Result<&mut Mapping> {
    doc.get_mut("services")
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| StackbootError::MalformedDescriptor("missing 'services' mapping".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHORED: &str = r#"
x-common: &common
  environment: &common-env
    MODE: worker
    VERBOSE: true
  depends_on:
    db:
      condition: service_healthy

services:
  web:
    <<: *common
    command: serve
  worker:
    <<: *common
  db:
    image: postgres:13
"#;

    #[test]
    fn test_parse_resolves_merge_keys() {
        let doc = parse_str(ANCHORED).unwrap();

        let web = &doc["services"]["web"];
        assert_eq!(web["command"], "serve");
        assert_eq!(web["environment"]["MODE"], "worker");
        assert!(web["depends_on"]["db"].is_mapping());

        let worker = &doc["services"]["worker"];
        assert_eq!(worker["environment"]["MODE"], "worker");
    }

    #[test]
    fn test_serialize_emits_no_aliases() {
        let doc = parse_str(ANCHORED).unwrap();
        let text = serialize(&doc).unwrap();

        assert!(!text.contains('&'));
        assert!(!text.contains('*'));
        assert!(!text.contains("<<"));
    }

    #[test]
    fn test_round_trip_is_structurally_equal() {
        let doc = parse_str(ANCHORED).unwrap();
        let reparsed = parse_str(&serialize(&doc).unwrap()).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn test_round_trip_preserves_scalar_types() {
        let mut doc = parse_str(ANCHORED).unwrap();

        // A transformer-written string must not come back as a boolean
        let env = doc["services"]["web"]["environment"]
            .as_mapping_mut()
            .unwrap();
        env.insert("FLAG".into(), "false".into());

        let reparsed = parse_str(&serialize(&doc).unwrap()).unwrap();
        let env = &reparsed["services"]["web"]["environment"];
        assert_eq!(env["FLAG"], Value::String("false".to_owned()));
        assert_eq!(env["VERBOSE"], Value::Bool(true));
    }

    #[test]
    fn test_parse_rejects_invalid_yaml() {
        let result = parse_str("services: [unbalanced");
        assert!(matches!(
            result,
            Err(StackbootError::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        let result = parse_str("- just\n- a\n- list\n");
        assert!(matches!(
            result,
            Err(StackbootError::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_services_requires_mapping() {
        let doc = parse_str("volumes: {}\n").unwrap();
        assert!(services(&doc).is_err());

        let doc = parse_str(ANCHORED).unwrap();
        assert_eq!(services(&doc).unwrap().len(), 3);
    }
}
