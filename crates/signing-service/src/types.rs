use std::fmt;

use serde::{Deserialize, Serialize};

/// A signing use-case. Each endpoint has its own set of usable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Blob,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Blob => "blob",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a key, as carried by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMeta {
    #[serde(default)]
    pub identifier: String,
}

impl KeyMeta {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Request to sign a digest with a named key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    #[serde(default)]
    pub key_meta: Option<KeyMeta>,
    /// Base64 (standard, padded) encoded digest.
    #[serde(default)]
    pub digest: String,
    /// Symbolic hash algorithm name, e.g. "SHA256".
    #[serde(default)]
    pub hash_algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetas {
    pub keys: Vec<KeyMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Base64 encoded signature bytes.
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Endpoint::Blob).unwrap(), json!("blob"));
        let parsed: Endpoint = serde_json::from_value(json!("blob")).unwrap();
        assert_eq!(parsed, Endpoint::Blob);
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        assert!(serde_json::from_value::<Endpoint>(json!("x509")).is_err());
    }

    #[test]
    fn signing_request_uses_camel_case() {
        let request: SigningRequest = serde_json::from_value(json!({
            "keyMeta": {"identifier": "key1"},
            "digest": "aGVsbG8=",
            "hashAlgorithm": "SHA256",
        }))
        .unwrap();

        assert_eq!(request.key_meta, Some(KeyMeta::new("key1")));
        assert_eq!(request.digest, "aGVsbG8=");
        assert_eq!(request.hash_algorithm, "SHA256");
    }

    #[test]
    fn signing_request_without_key_meta_parses() {
        let request: SigningRequest =
            serde_json::from_value(json!({"digest": "aGVsbG8="})).unwrap();
        assert!(request.key_meta.is_none());
        assert!(request.hash_algorithm.is_empty());
    }
}
