use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::RelyingPartyError;
use super::types::{
    AuthenticationOptions, AuthenticationOptionsRequest, ChallengeRequest, ChallengeResponse,
    PasskeyAuthResult, VerifyPasskeyRequest,
};
use crate::client::AssertCredentialResult;

const CHALLENGE_PATH: &str = "client/challenge";
const AUTHENTICATION_OPTIONS_PATH: &str = "client/user-authenticators/passkey/authentication-options";
const VERIFY_PASSKEY_PATH: &str = "client/verify/passkey";

/// `Basic` header carrying the URI-encoded tenant id.
pub fn basic_authorization(tenant_id: &str) -> String {
    let encoded = urlencoding::encode(tenant_id);
    format!("Basic {}", STANDARD.encode(encoded.as_bytes()))
}

/// Client for the relying party's passkey endpoints.
#[derive(Debug, Clone)]
pub struct RelyingPartyClient {
    http: reqwest::Client,
    base_url: String,
    authorization: String,
}

impl RelyingPartyClient {
    pub fn new(base_url: &str, tenant_id: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, tenant_id)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str, tenant_id: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: basic_authorization(tenant_id),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a ceremony; returns the challenge id.
    pub async fn request_challenge(&self, action: &str) -> Result<String, RelyingPartyError> {
        let response: ChallengeResponse = self
            .post(CHALLENGE_PATH, &ChallengeRequest { action })
            .await?;
        Ok(response.challenge_id)
    }

    pub async fn authentication_options(
        &self,
        challenge_id: &str,
    ) -> Result<AuthenticationOptions, RelyingPartyError> {
        self.post(
            AUTHENTICATION_OPTIONS_PATH,
            &AuthenticationOptionsRequest { challenge_id },
        )
        .await
    }

    pub async fn present_passkey(
        &self,
        challenge_id: &str,
        assertion: &AssertCredentialResult,
        device_id: &str,
    ) -> Result<PasskeyAuthResult, RelyingPartyError> {
        let body = VerifyPasskeyRequest {
            challenge_id,
            authentication_credential: assertion.into(),
            device_id,
        };
        self.post(VERIFY_PASSKEY_PATH, &body).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RelyingPartyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, &self.authorization)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "Relying party responded");

        let text = response.text().await?;
        if status != StatusCode::OK {
            return Err(RelyingPartyError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(RelyingPartyError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_matches_btoa() {
        // btoa(encodeURIComponent("e768822f-b1a1-404c-a685-0e37905ca5f5"))
        assert_eq!(
            basic_authorization("e768822f-b1a1-404c-a685-0e37905ca5f5"),
            "Basic ZTc2ODgyMmYtYjFhMS00MDRjLWE2ODUtMGUzNzkwNWNhNWY1"
        );
    }

    #[test]
    fn test_basic_authorization_encodes_uri_component() {
        // "a b" -> "a%20b"
        assert_eq!(basic_authorization("a b"), "Basic YSUyMGI=");
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = RelyingPartyClient::new("https://au.api.authsignal.com/v1/", "tenant");
        assert_eq!(
            client.endpoint(CHALLENGE_PATH),
            "https://au.api.authsignal.com/v1/client/challenge"
        );
        assert_eq!(
            client.endpoint("/client/verify/passkey"),
            "https://au.api.authsignal.com/v1/client/verify/passkey"
        );
    }
}
