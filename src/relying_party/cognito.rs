use std::collections::HashMap;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::RelyingPartyError;

pub const DEFAULT_COGNITO_URL: &str = "https://cognito-idp.ap-southeast-2.amazonaws.com/";
const AMZ_JSON: &str = "application/x-amz-json-1.1";
const AMZ_TARGET: &str = "X-Amz-Target";
const INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const RESPOND_TO_AUTH_CHALLENGE: &str = "AWSCognitoIdentityProviderService.RespondToAuthChallenge";
const CUSTOM_AUTH: &str = "CUSTOM_AUTH";
const CUSTOM_CHALLENGE: &str = "CUSTOM_CHALLENGE";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow:       &'static str,
    auth_parameters: UsernameParameters<'a>,
    client_metadata: ClientMetadata<'a>,
    client_id:       &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct UsernameParameters<'a> {
    username: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientMetadata<'a> {
    anonymous_id: &'a str,
    user_agent:   &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RespondToAuthChallengeRequest<'a> {
    challenge_name:      &'static str,
    challenge_responses: ChallengeAnswer<'a>,
    session:             &'a str,
    client_id:           &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ChallengeAnswer<'a> {
    username: &'a str,
    answer:   &'a str,
}

/// InitiateAuth / RespondToAuthChallenge response. Either another challenge
/// (with a session) or the final tokens.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthChallengeResponse {
    #[serde(default)]
    pub challenge_name:        Option<String>,
    #[serde(default)]
    pub challenge_parameters:  HashMap<String, String>,
    #[serde(default)]
    pub session:               Option<String>,
    #[serde(default)]
    pub authentication_result: Option<CognitoTokens>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CognitoTokens {
    pub access_token:  String,
    #[serde(default)]
    pub id_token:      Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in:    Option<u64>,
    #[serde(default)]
    pub token_type:    Option<String>,
}

/// Cognito user pool client for the CUSTOM_AUTH flow that accepts the
/// passkey access token as the challenge answer.
#[derive(Debug, Clone)]
pub struct CognitoClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
}

impl CognitoClient {
    pub fn new(endpoint: &str, client_id: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint, client_id)
    }

    pub fn with_http_client(http: reqwest::Client, endpoint: &str, client_id: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            client_id: client_id.to_string(),
        }
    }

    pub async fn initiate_auth(
        &self,
        username: &str,
        device_id: &str,
    ) -> Result<AuthChallengeResponse, RelyingPartyError> {
        let body = InitiateAuthRequest {
            auth_flow: CUSTOM_AUTH,
            auth_parameters: UsernameParameters { username },
            client_metadata: ClientMetadata {
                anonymous_id: device_id,
                user_agent: USER_AGENT,
            },
            client_id: &self.client_id,
        };
        self.post(INITIATE_AUTH, &body).await
    }

    pub async fn respond_to_challenge(
        &self,
        username: &str,
        session: &str,
        answer: &str,
    ) -> Result<AuthChallengeResponse, RelyingPartyError> {
        let body = RespondToAuthChallengeRequest {
            challenge_name: CUSTOM_CHALLENGE,
            challenge_responses: ChallengeAnswer { username, answer },
            session,
            client_id: &self.client_id,
        };
        self.post(RESPOND_TO_AUTH_CHALLENGE, &body).await
    }

    async fn post<B, T>(&self, target: &str, body: &B) -> Result<T, RelyingPartyError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        // Cognito wants its own JSON media type, so `.json()` is not used.
        let payload = serde_json::to_vec(body)
            .map_err(|e| RelyingPartyError::Protocol(format!("encode {target}: {e}")))?;
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, AMZ_JSON)
            .header(AMZ_TARGET, target)
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        tracing::debug!(amz_target = %target, status = status.as_u16(), "Cognito responded");

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

/// Trade a verified passkey's access token for Cognito user pool tokens.
pub async fn cognito_login(
    cognito: &CognitoClient,
    username: &str,
    device_id: &str,
    passkey_token: &str,
) -> Result<CognitoTokens, RelyingPartyError> {
    let challenge = cognito.initiate_auth(username, device_id).await?;
    tracing::info!(challenge = ?challenge.challenge_name, "Cognito challenge issued");
    let session = challenge
        .session
        .ok_or_else(|| RelyingPartyError::Protocol("InitiateAuth returned no session".into()))?;

    let answer = cognito
        .respond_to_challenge(username, &session, passkey_token)
        .await?;
    answer.authentication_result.ok_or_else(|| {
        RelyingPartyError::Protocol(format!(
            "challenge answer not accepted, next challenge {:?}",
            answer.challenge_name
        ))
    })
}
