use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::policy::KeyUsagePolicy;
use crate::signing::{DigestSigner, KeyStore, RsaSigner, Secp256k1Signer};
use crate::types::Endpoint;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate key identifier {0:?}")]
    DuplicateKey(String),
    #[error("key {0:?} has an empty seed")]
    EmptySeed(String),
    #[error("endpoint {0} is listed more than once in keyUsages")]
    DuplicateEndpoint(Endpoint),
    #[error("key usage for {endpoint} references unknown key {identifier:?}")]
    UnknownKey {
        endpoint: Endpoint,
        identifier: String,
    },
    #[error("failed to load key {identifier:?}: {reason:#}")]
    KeyLoad {
        identifier: String,
        reason: anyhow::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    Secp256k1,
    Rsa,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyConfig {
    pub identifier: String,
    pub algorithm: KeyAlgorithm,
    pub seed: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyUsageConfig {
    pub endpoint: Endpoint,
    #[serde(default)]
    pub identifiers: Vec<String>,
}

/// Service configuration file.
///
/// ```json
/// {
///   "keys": [{ "identifier": "key1", "algorithm": "secp256k1", "seed": "..." }],
///   "keyUsages": [{ "endpoint": "blob", "identifiers": ["key1"] }]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub keys: Vec<KeyConfig>,
    #[serde(default)]
    pub key_usages: Vec<KeyUsageConfig>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON config.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut identifiers = HashSet::new();
        for key in &self.keys {
            if !identifiers.insert(key.identifier.as_str()) {
                return Err(ConfigError::DuplicateKey(key.identifier.clone()));
            }
            if key.seed.is_empty() {
                return Err(ConfigError::EmptySeed(key.identifier.clone()));
            }
        }

        let mut endpoints = HashSet::new();
        for usage in &self.key_usages {
            if !endpoints.insert(usage.endpoint) {
                return Err(ConfigError::DuplicateEndpoint(usage.endpoint));
            }
            if let Some(unknown) = usage
                .identifiers
                .iter()
                .find(|id| !identifiers.contains(id.as_str()))
            {
                return Err(ConfigError::UnknownKey {
                    endpoint: usage.endpoint,
                    identifier: unknown.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn key_usage_policy(&self) -> KeyUsagePolicy {
        self.key_usages
            .iter()
            .map(|usage| (usage.endpoint, usage.identifiers.iter().cloned()))
            .collect()
    }

    /// Derives every configured key. RSA keys take a moment to generate.
    pub fn build_key_store(&self) -> Result<KeyStore, ConfigError> {
        let mut store = KeyStore::new();
        for key in &self.keys {
            let signer = load_key(key).map_err(|reason| ConfigError::KeyLoad {
                identifier: key.identifier.clone(),
                reason,
            })?;
            info!(identifier = %key.identifier, algorithm = signer.algorithm(), "loaded signing key");
            store
                .insert(key.identifier.clone(), signer)
                .map_err(|_| ConfigError::DuplicateKey(key.identifier.clone()))?;
        }
        Ok(store)
    }
}

fn load_key(key: &KeyConfig) -> anyhow::Result<Arc<dyn DigestSigner>> {
    let signer: Arc<dyn DigestSigner> = match key.algorithm {
        KeyAlgorithm::Secp256k1 => Arc::new(Secp256k1Signer::from_seed(&key.seed)?),
        KeyAlgorithm::Rsa => Arc::new(RsaSigner::from_seed(&key.seed)?),
    };
    Ok(signer)
}
