use serde::Deserialize;
use std::path::Path;

use super::{Credential, CredentialError};

/// Accepted file shapes: a bare credential, or a Bitwarden login cipher.
#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialFile {
    Cipher { login: Login },
    Single(Credential),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Login {
    #[serde(default)]
    fido2_credentials: Vec<Credential>,
}

/// Read + parse the credential file at `path`.
pub fn load_credential(path: &Path) -> Result<Credential, CredentialError> {
    let bytes = std::fs::read(path)?;
    let credential = parse_credential(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        rp_id = %credential.rp_id,
        "Credential loaded"
    );
    Ok(credential)
}

/// Parse credential JSON. Only one credential is ever used; extras in an export are ignored.
pub fn parse_credential(bytes: &[u8]) -> Result<Credential, CredentialError> {
    let file: CredentialFile = serde_json::from_slice(bytes)?;
    let credential = match file {
        CredentialFile::Single(credential) => credential,
        CredentialFile::Cipher { login } => {
            let count = login.fido2_credentials.len();
            let mut creds = login.fido2_credentials.into_iter();
            let first = creds.next().ok_or(CredentialError::NotFound)?;
            if count > 1 {
                tracing::warn!(count, rp_id = %first.rp_id, "Export holds several passkeys, using the first");
            }
            first
        }
    };
    credential.check_key_type()?;
    Ok(credential)
}
