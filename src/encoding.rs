use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Base64url without padding, the transport encoding for every binary field.
pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode base64url. Standard-alphabet input and trailing `=` padding are
/// accepted too, since credential exports mix both.
pub fn base64url_decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = text
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized)
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Truncate to 32 bits and pack big-endian, as authenticatorData stores the sign count.
pub fn counter_be_bytes(counter: u64) -> [u8; 4] {
    (counter as u32).to_be_bytes()
}
