pub mod counter;
pub mod disk;
pub mod id;
pub mod record;

pub use counter::{CounterPolicy, SignCounter};
pub use disk::{load_credential, parse_credential};
pub use id::{encode_credential_id, parse_credential_id};
pub use record::Credential;

#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("invalid credential identifier: {0}")]
    InvalidIdentifier(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported key {algorithm}/{curve}, only ECDSA/P-256 is supported")]
    UnsupportedKey { algorithm: String, curve: String },
    #[error("Counter: {0}")]
    Counter(String),
    #[error("No passkey in credential file")]
    NotFound,
}
