use serde::{Deserialize, Serialize};

use crate::client::AssertCredentialResult;

pub const CREDENTIAL_TYPE_PUBLIC_KEY: &str = "public-key";
pub const ATTACHMENT_PLATFORM: &str = "platform";

#[derive(Debug, Serialize)]
pub(crate) struct ChallengeRequest<'a> {
    pub action: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChallengeResponse {
    pub challenge_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthenticationOptionsRequest<'a> {
    pub challenge_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptions {
    #[serde(default)]
    pub challenge_id: Option<String>,
    pub options:      RequestOptions,
}

/// The `publicKey` request options the relying party wants asserted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub rp_id:             String,
    pub challenge:         String,
    #[serde(default)]
    pub allow_credentials: Vec<serde_json::Value>,
    #[serde(default)]
    pub timeout:           Option<u64>,
    #[serde(default)]
    pub user_verification: Option<String>,
}

impl RequestOptions {
    /// `id` of every allowCredentials descriptor that has one.
    pub fn allowed_credential_ids(&self) -> Vec<String> {
        self.allow_credentials
            .iter()
            .filter_map(|descriptor| descriptor.get("id")?.as_str().map(str::to_string))
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyPasskeyRequest<'a> {
    pub challenge_id:              &'a str,
    pub authentication_credential: AuthenticationCredential<'a>,
    pub device_id:                 &'a str,
}

/// `PublicKeyCredential` JSON for an assertion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationCredential<'a> {
    pub id:                       &'a str,
    pub raw_id:                   &'a str,
    pub response:                 AssertionResponse<'a>,
    #[serde(rename = "type")]
    pub kind:                     &'static str,
    pub client_extension_results: serde_json::Map<String, serde_json::Value>,
    pub authenticator_attachment: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponse<'a> {
    pub authenticator_data: &'a str,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json:   &'a str,
    pub signature:          &'a str,
    pub user_handle:        &'a str,
}

impl<'a> From<&'a AssertCredentialResult> for AuthenticationCredential<'a> {
    fn from(assertion: &'a AssertCredentialResult) -> Self {
        Self {
            id: &assertion.credential_id,
            raw_id: &assertion.credential_id,
            response: AssertionResponse {
                authenticator_data: &assertion.authenticator_data,
                client_data_json: &assertion.client_data_json,
                signature: &assertion.signature,
                user_handle: &assertion.user_handle,
            },
            kind: CREDENTIAL_TYPE_PUBLIC_KEY,
            client_extension_results: serde_json::Map::new(),
            authenticator_attachment: ATTACHMENT_PLATFORM,
        }
    }
}

/// Verification outcome. `access_token` is the credential the whole login exists to obtain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyAuthResult {
    pub is_verified:           bool,
    #[serde(default)]
    pub access_token:          Option<String>,
    #[serde(default)]
    pub user_id:               Option<String>,
    #[serde(default)]
    pub user_authenticator_id: Option<String>,
    #[serde(default)]
    pub username:              Option<String>,
    #[serde(default)]
    pub user_display_name:     Option<String>,
}
