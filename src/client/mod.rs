//! WebAuthn client side of the `get` ceremony: builds the client data, drives
//! the authenticator and encodes its output for the relying party.

pub mod assert;
pub mod client_data;

pub use assert::{AssertCredentialParams, AssertCredentialResult, Fido2Client, UserVerification};
pub use client_data::CollectedClientData;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("The operation either timed out or was not allowed.")]
    NotAllowed,
}

impl ClientError {
    /// DOMException name a browser would raise.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotAllowed => "NotAllowedError",
        }
    }
}
