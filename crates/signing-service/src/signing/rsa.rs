use anyhow::{Context, Result};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use super::signer::DigestSigner;
use crate::hash::HashAlgorithm;

const RSA_KEY_BITS: usize = 2048;

/// RSA PKCS#1 v1.5 signer over prehashed digests.
///
/// Created from a seed string: the SHA-256 hash of the seed
/// seeds a deterministic CSPRNG used for RSA key generation.
pub struct RsaSigner {
    private_key: RsaPrivateKey,
}

impl RsaSigner {
    pub fn from_seed(seed: &str) -> Result<Self> {
        let hash = Sha256::digest(seed.as_bytes());
        let mut rng = ChaCha20Rng::from_seed(hash.into());
        let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
            .context("generating RSA key from seed")?;
        Ok(Self { private_key })
    }
}

fn padding_for(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha224 => Pkcs1v15Sign::new::<Sha224>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

impl DigestSigner for RsaSigner {
    fn sign_digest(&self, digest: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>> {
        self.private_key
            .sign(padding_for(hash), digest)
            .with_context(|| format!("RSA PKCS#1 v1.5 signing with {hash}"))
    }

    fn public_key_pem(&self) -> Result<String> {
        self.private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| anyhow::anyhow!("encoding RSA public key to PEM: {e}"))
    }

    fn algorithm(&self) -> &str {
        "rsa-pkcs1v15"
    }
}
