use serde::{Deserialize, Deserializer, Serialize};

use super::CredentialError;

pub const KEY_ALGORITHM_ECDSA: &str = "ECDSA";
pub const KEY_CURVE_P256: &str = "P-256";

/// The single pre-provisioned passkey, in Bitwarden export field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub credential_id: String,      // GUID or "b64."-tagged base64url
    pub rp_id:         String,
    pub user_handle:   String,      // base64url, sent as decoded bytes
    #[serde(default)]
    pub user_name:     Option<String>,
    pub key_algorithm: String,      // "ECDSA"
    pub key_curve:     String,      // "P-256"
    pub key_value:     String,      // base64url PKCS#8 DER
    #[serde(default, deserialize_with = "number_or_string")]
    pub counter:       u32,
}

impl Credential {
    /// Reject key types this authenticator cannot sign with.
    pub fn check_key_type(&self) -> Result<(), CredentialError> {
        if self.key_algorithm.eq_ignore_ascii_case(KEY_ALGORITHM_ECDSA)
            && self.key_curve.eq_ignore_ascii_case(KEY_CURVE_P256)
        {
            Ok(())
        } else {
            Err(CredentialError::UnsupportedKey {
                algorithm: self.key_algorithm.clone(),
                curve: self.key_curve.clone(),
            })
        }
    }
}

// Bitwarden exports the counter as a string.
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.is_empty() => Ok(0),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
