use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client_data::CollectedClientData;
use crate::authenticator::{
    Authenticator, CryptoProvider, GetAssertionParams, GetAssertionResult, SoftwareCrypto,
};
use crate::encoding::{base64url_decode, base64url_encode, sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    Discouraged,
    #[default]
    Preferred,
    Required,
}

#[derive(Debug, Clone, Default)]
pub struct AssertCredentialParams {
    /// base64url credential ids from the relying party; any id is accepted.
    pub allowed_credential_ids: Vec<String>,
    pub rp_id:                  String,
    pub origin:                 String,
    pub challenge:              String,
    pub user_verification:      UserVerification,
}

/// Assertion fields as base64url strings, ready for the relying party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertCredentialResult {
    pub credential_id:      String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json:   String,
    pub authenticator_data: String,
    pub signature:          String,
    pub user_handle:        String,
}

/// WebAuthn client bound to one software authenticator.
pub struct Fido2Client<C = SoftwareCrypto> {
    authenticator: Authenticator<C>,
}

impl<C: CryptoProvider> Fido2Client<C> {
    pub fn new(authenticator: Authenticator<C>) -> Self {
        Self { authenticator }
    }

    pub fn authenticator(&self) -> &Authenticator<C> {
        &self.authenticator
    }

    pub fn assert_credential(
        &self,
        params: &AssertCredentialParams,
    ) -> Result<AssertCredentialResult, ClientError> {
        tracing::debug!(
            rp_id = %params.rp_id,
            origin = %params.origin,
            user_verification = ?params.user_verification,
            "assertCredential"
        );

        let client_data_json = CollectedClientData::get(&params.challenge, &params.origin)
            .to_json()
            .map_err(|e| {
                tracing::warn!(error = %e, "Could not serialize client data");
                ClientError::NotAllowed
            })?;
        let client_data_hash = sha256(client_data_json.as_bytes());

        let get_params = GetAssertionParams {
            rp_id: params.rp_id.clone(),
            client_data_hash: client_data_hash.to_vec(),
            allow_list: map_allow_list(&params.allowed_credential_ids),
            attested_key: None,
        };

        let result = self.authenticator.get_assertion(&get_params).map_err(|e| {
            tracing::info!(error = %e, cause = %e.cause(), "Assertion aborted");
            ClientError::NotAllowed
        })?;

        Ok(encode_result(&result, client_data_json.as_bytes()))
    }
}

fn map_allow_list(ids: &[String]) -> Vec<Vec<u8>> {
    ids.iter()
        .filter_map(|id| match base64url_decode(id) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Skipping undecodable allowed credential id");
                None
            }
        })
        .collect()
}

fn encode_result(result: &GetAssertionResult, client_data_json: &[u8]) -> AssertCredentialResult {
    AssertCredentialResult {
        credential_id: base64url_encode(&result.selected_credential.id),
        client_data_json: base64url_encode(client_data_json),
        authenticator_data: base64url_encode(&result.authenticator_data),
        signature: base64url_encode(&result.signature),
        user_handle: result
            .selected_credential
            .user_handle
            .as_deref()
            .map(base64url_encode)
            .unwrap_or_default(),
    }
}
