use std::fmt;

/// Hash algorithm the submitted digest was produced with.
///
/// Passed to the signer so it can pick matching signing parameters
/// (e.g. the DigestInfo prefix for RSA PKCS#1 v1.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Resolves a symbolic algorithm name.
    ///
    /// Names are matched case-sensitively. Anything unrecognized, including
    /// the empty string, resolves to SHA-512 instead of failing. Existing
    /// callers rely on that fallback, so it must stay total.
    pub fn resolve(name: &str) -> Self {
        match name {
            "SHA224" => Self::Sha224,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            _ => Self::Sha512,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha224 => "SHA224",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }

    /// Digest output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
