use uuid::Uuid;

use super::IdError;
use crate::encoding::{base64url_decode, base64url_encode};

/// Prefix marking a credential id stored as base64url raw bytes.
pub const RAW_ID_PREFIX: &str = "b64.";

const GUID_LEN: usize = 36;
const GUID_HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Parse a stored credential id into the raw bytes sent to the relying party.
pub fn parse_credential_id(text: &str) -> Result<Vec<u8>, IdError> {
    if let Some(encoded) = text.strip_prefix(RAW_ID_PREFIX) {
        return base64url_decode(encoded)
            .map_err(|e| IdError::InvalidIdentifier(format!("{text:?}: {e}")));
    }
    guid_to_raw(text).map(|raw| raw.to_vec())
}

/// Canonical `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` GUID to its 16 RFC-4122 bytes.
pub fn guid_to_raw(guid: &str) -> Result<[u8; 16], IdError> {
    let bytes = guid.as_bytes();
    let well_formed = bytes.len() == GUID_LEN
        && bytes.iter().enumerate().all(|(i, b)| {
            if GUID_HYPHENS.contains(&i) {
                *b == b'-'
            } else {
                b.is_ascii_hexdigit()
            }
        });
    if !well_formed {
        return Err(IdError::InvalidIdentifier(format!("{guid:?} is not a GUID")));
    }
    let uuid = Uuid::try_parse(guid)
        .map_err(|e| IdError::InvalidIdentifier(format!("{guid:?}: {e}")))?;
    Ok(*uuid.as_bytes())
}

/// Inverse of [`guid_to_raw`]: 16 raw bytes to a lowercase hyphenated GUID.
pub fn guid_from_raw(raw: &[u8]) -> Result<String, IdError> {
    let bytes: [u8; 16] = raw
        .try_into()
        .map_err(|_| IdError::InvalidIdentifier(format!("GUID needs 16 bytes, got {}", raw.len())))?;
    Ok(Uuid::from_bytes(bytes).hyphenated().to_string())
}

/// Textual form of a raw id: GUID when it is 16 bytes long, tagged base64url otherwise.
pub fn encode_credential_id(raw: &[u8]) -> String {
    match guid_from_raw(raw) {
        Ok(guid) => guid,
        Err(_) => format!("{RAW_ID_PREFIX}{}", base64url_encode(raw)),
    }
}
