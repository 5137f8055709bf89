use anyhow::Result;
use k256::ecdsa::{Signature, SigningKey, signature::hazmat::PrehashSigner};
use k256::pkcs8::{EncodePublicKey, LineEnding};
use sha2::{Digest, Sha256};

use super::signer::DigestSigner;
use crate::hash::HashAlgorithm;

/// ECDSA signer using the secp256k1 curve.
///
/// Created from a seed string: the SHA-256 hash of the seed
/// becomes the 32-byte private key. Signatures are DER encoded.
pub struct Secp256k1Signer {
    signing_key: SigningKey,
}

impl Secp256k1Signer {
    pub fn from_seed(seed: &str) -> Result<Self> {
        let hash = Sha256::digest(seed.as_bytes());
        let signing_key = SigningKey::from_bytes(&hash)
            .map_err(|e| anyhow::anyhow!("invalid seed: {e}"))?;
        Ok(Self { signing_key })
    }
}

impl DigestSigner for Secp256k1Signer {
    // ECDSA signs the prehash directly, the hash choice only shows up in its length.
    fn sign_digest(&self, digest: &[u8], _hash: HashAlgorithm) -> Result<Vec<u8>> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| anyhow::anyhow!("secp256k1 sign_prehash failed: {e}"))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn public_key_pem(&self) -> Result<String> {
        self.signing_key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| anyhow::anyhow!("encoding secp256k1 public key to PEM: {e}"))
    }

    fn algorithm(&self) -> &str {
        "secp256k1"
    }
}
