use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;

use super::CryptoError;
use crate::encoding;

/// Cryptographic capabilities the authenticator needs. Passed in explicitly so
/// tests can pin keys or inject failures.
pub trait CryptoProvider {
    type SigningKey;

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        encoding::sha256(data)
    }

    /// Import an ECDSA P-256 private key from PKCS#8 DER.
    fn import_pkcs8(&self, der: &[u8]) -> Result<Self::SigningKey, CryptoError>;

    /// ECDSA over SHA-256(`payload`). Returns the raw r || s form.
    fn sign_p1363(&self, key: &Self::SigningKey, payload: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// In-process P-256 keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareCrypto;

impl CryptoProvider for SoftwareCrypto {
    type SigningKey = SigningKey;

    fn import_pkcs8(&self, der: &[u8]) -> Result<SigningKey, CryptoError> {
        SigningKey::from_pkcs8_der(der).map_err(|e| CryptoError::KeyImportFailure(e.to_string()))
    }

    fn sign_p1363(&self, key: &SigningKey, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signature: Signature = key
            .try_sign(payload)
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}
