//! Request Fingerprints - SHA-256 over Canonical JSON
//!
//! Identical requests always map to the same fingerprint and synthesis id.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Lower-case hex SHA-256 of raw bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Serialize with object keys sorted at every depth and no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&sorted(value))
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

/// Fingerprint of a synthesis request.
pub fn request_fingerprint<T: Serialize>(request: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(request)?.as_bytes()))
}

pub fn prompt_digest(prompt: &str) -> String {
    sha256_hex(prompt.as_bytes())
}

/// Name-based UUID derived from a fingerprint.
pub fn synthesis_id(fingerprint: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("promptforge:{}", fingerprint).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let a = json!({"z": 1, "a": {"y": [{"b": 1, "a": 2}], "x": 0}});
        let b = json!({"a": {"x": 0, "y": [{"a": 2, "b": 1}]}, "z": 1});
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
        assert_eq!(canonical_json(&json!({"b": 1, "a": 2})).unwrap(), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_synthesis_id_is_stable() {
        let fp = request_fingerprint(&json!({"product": "chair"})).unwrap();
        assert_eq!(synthesis_id(&fp), synthesis_id(&fp));
        assert_ne!(synthesis_id(&fp), synthesis_id("other"));
    }
}
