#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Credential: {0}")]
    Credential(#[from] crate::credential::CredentialError),
    #[error("Client: {0}")]
    Client(#[from] crate::client::ClientError),
    #[error("Relying party: {0}")]
    RelyingParty(#[from] crate::relying_party::RelyingPartyError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
