pub mod authenticator_data;
pub mod crypto;
pub mod get_assertion;
pub mod signature;

pub use authenticator_data::{AttestedKey, AuthenticatorFlags};
pub use crypto::{CryptoProvider, SoftwareCrypto};
pub use get_assertion::{
    AssertionInputs, Authenticator, GetAssertionParams, GetAssertionResult, SelectedCredential,
    generate_assertion,
};
pub use signature::p1363_to_der;

use crate::credential::{CredentialError, IdError};

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed signature: expected 64 bytes r||s, got {0}")]
    MalformedSignature(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key import failed: {0}")]
    KeyImportFailure(String),
    #[error("signing failed: {0}")]
    SigningFailure(String),
}

/// Why an assertion could not be produced. Never leaves the authenticator
/// except as the source of [`AuthenticatorError::Unknown`].
#[derive(Debug, thiserror::Error)]
pub enum AssertionFailure {
    #[error(transparent)]
    InvalidIdentifier(#[from] IdError),
    #[error(transparent)]
    MalformedSignature(#[from] SignatureError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("invalid user handle: {0}")]
    InvalidUserHandle(String),
    #[error("credential: {0}")]
    Credential(#[from] CredentialError),
    #[error("encoding: {0}")]
    Encoding(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticatorError {
    #[error("unknown authenticator error")]
    Unknown(#[source] AssertionFailure),
}

impl AuthenticatorError {
    /// WebAuthn authenticator error name.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "UnknownError",
        }
    }

    pub fn cause(&self) -> &AssertionFailure {
        match self {
            Self::Unknown(cause) => cause,
        }
    }
}
