use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::hash::HashAlgorithm;

/// Backend holding private key material.
///
/// Shared by every in-flight call, so implementations must tolerate
/// concurrent use. Failures are opaque to the service and surface to
/// callers only as an internal error.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs an already hashed `digest` with the key named `identifier`.
    async fn sign(
        &self,
        cancel: &CancellationToken,
        digest: &[u8],
        hash: HashAlgorithm,
        identifier: &str,
    ) -> anyhow::Result<Vec<u8>>;

    /// Encoded public half of the key named `identifier`.
    async fn public_key(
        &self,
        cancel: &CancellationToken,
        identifier: &str,
    ) -> anyhow::Result<Vec<u8>>;
}

/// A single private key able to sign prehashed digests.
///
/// Implementations are sync, signing is CPU-bound.
pub trait DigestSigner: Send + Sync {
    /// Sign a digest produced by `hash`. Returns raw signature bytes.
    fn sign_digest(&self, digest: &[u8], hash: HashAlgorithm) -> anyhow::Result<Vec<u8>>;

    /// PEM encoded SubjectPublicKeyInfo.
    fn public_key_pem(&self) -> anyhow::Result<String>;

    /// Algorithm identifier string (e.g. "secp256k1").
    fn algorithm(&self) -> &str;
}
