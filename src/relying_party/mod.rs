pub mod client;
pub mod cognito;
pub mod login;
pub mod types;

pub use client::{RelyingPartyClient, basic_authorization};
pub use cognito::{CognitoClient, CognitoTokens, cognito_login};
pub use login::{LoginOptions, login};
pub use types::{AuthenticationCredential, AuthenticationOptions, PasskeyAuthResult, RequestOptions};

#[derive(Debug, thiserror::Error)]
pub enum RelyingPartyError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Relying party returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Decode: {0}")]
    Decode(serde_json::Error),
    #[error("Protocol: {0}")]
    Protocol(String),
}
