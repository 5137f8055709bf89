use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::signer::{DigestSigner, Signer};
use crate::hash::HashAlgorithm;

/// In-process key store holding software keys by identifier.
#[derive(Default, Clone)]
pub struct KeyStore {
    keys: HashMap<String, Arc<dyn DigestSigner>>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key. Fails if `identifier` is already taken.
    pub fn insert(&mut self, identifier: impl Into<String>, key: Arc<dyn DigestSigner>) -> Result<()> {
        let identifier = identifier.into();
        if self.keys.contains_key(&identifier) {
            bail!("duplicate key identifier {identifier:?}");
        }
        self.keys.insert(identifier, key);
        Ok(())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.keys.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn key(&self, identifier: &str) -> Result<&Arc<dyn DigestSigner>> {
        self.keys
            .get(identifier)
            .with_context(|| format!("no key loaded for identifier {identifier:?}"))
    }
}

#[async_trait]
impl Signer for KeyStore {
    async fn sign(
        &self,
        cancel: &CancellationToken,
        digest: &[u8],
        hash: HashAlgorithm,
        identifier: &str,
    ) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            bail!("signing with {identifier:?} cancelled by caller");
        }
        let key = Arc::clone(self.key(identifier)?);
        debug!(identifier, algorithm = key.algorithm(), hash = %hash, "signing digest");

        // RSA signing takes milliseconds, keep it off the async workers.
        let digest = digest.to_vec();
        tokio::task::spawn_blocking(move || key.sign_digest(&digest, hash))
            .await
            .with_context(|| format!("signing task for key {identifier:?} did not finish"))?
            .with_context(|| format!("signing with key {identifier:?}"))
    }

    async fn public_key(&self, cancel: &CancellationToken, identifier: &str) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            bail!("public key lookup for {identifier:?} cancelled by caller");
        }
        let pem = self.key(identifier)?.public_key_pem()?;
        Ok(pem.into_bytes())
    }
}
