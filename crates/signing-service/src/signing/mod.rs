mod signer;
mod secp256k1;
mod rsa;
mod keystore;

pub use signer::{DigestSigner, Signer};
pub use secp256k1::Secp256k1Signer;
pub use self::rsa::RsaSigner;
pub use keystore::KeyStore;
