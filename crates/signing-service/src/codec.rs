use std::borrow::Cow;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{self, GeneralPurpose, STANDARD};

/// Standard padded alphabet that ignores non-zero bits after the last symbol.
const DIGEST_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_allow_trailing_bits(true),
);

/// Decodes a standard, padded base64 payload. Line breaks are skipped.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let text = if text.contains(['\r', '\n']) {
        Cow::Owned(text.replace(['\r', '\n'], ""))
    } else {
        Cow::Borrowed(text)
    };
    DIGEST_ENGINE.decode(text.as_bytes())
}

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
