use ciborium::value::Value;
use p256::ecdsa::VerifyingKey;
use std::ops::BitOr;

use super::AssertionFailure;
use crate::encoding::counter_be_bytes;

/// Length of authenticatorData without attested credential data.
pub const AUTH_DATA_BASE_LEN: usize = 32 + 1 + 4;
/// Length of the COSE EC2 P-256 key produced by [`encode_cose_key`].
pub const COSE_KEY_LEN: usize = 77;

/// authenticatorData flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthenticatorFlags(u8);

impl AuthenticatorFlags {
    pub const USER_PRESENT: Self = Self(1 << 0);
    pub const USER_VERIFIED: Self = Self(1 << 2);
    pub const BACKUP_ELIGIBLE: Self = Self(1 << 3);
    pub const BACKUP_STATE: Self = Self(1 << 4);
    pub const ATTESTED_CREDENTIAL_DATA: Self = Self(1 << 6);
    pub const EXTENSION_DATA: Self = Self(1 << 7);

    /// Flags for an assertion from this authenticator: presence and
    /// verification are always asserted and credentials count as synced.
    pub fn assertion(attested: bool) -> Self {
        let flags = Self::USER_PRESENT
            | Self::USER_VERIFIED
            | Self::BACKUP_ELIGIBLE
            | Self::BACKUP_STATE;
        if attested {
            flags | Self::ATTESTED_CREDENTIAL_DATA
        } else {
            flags
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AuthenticatorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Affine coordinates of a P-256 public key, each left-padded to 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedKey {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl From<&VerifyingKey> for AttestedKey {
    fn from(key: &VerifyingKey) -> Self {
        // Uncompressed SEC1: 0x04 || x || y, coordinates already fixed-width.
        let point = key.to_encoded_point(false);
        let bytes = point.as_bytes();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[1..33]);
        y.copy_from_slice(&bytes[33..65]);
        Self { x, y }
    }
}

/// Attested credential data block: AAGUID, credential id and its public key.
pub struct AttestedCredentialData<'a> {
    pub aaguid: &'a [u8; 16],
    pub credential_id: &'a [u8],
    pub key: &'a AttestedKey,
}

/// Build authenticatorData: rpIdHash || flags || signCount, then the
/// attested credential block when one is given (AT=1).
pub fn build_authenticator_data(
    rp_id_hash: &[u8; 32],
    sign_count: u32,
    attested: Option<&AttestedCredentialData<'_>>,
) -> Result<Vec<u8>, AssertionFailure> {
    let flags = AuthenticatorFlags::assertion(attested.is_some());
    let mut data = Vec::with_capacity(AUTH_DATA_BASE_LEN);
    data.extend_from_slice(rp_id_hash);
    data.push(flags.bits());
    data.extend_from_slice(&counter_be_bytes(sign_count.into()));

    if let Some(attested) = attested {
        let cred_id_len = u16::try_from(attested.credential_id.len()).map_err(|_| {
            AssertionFailure::Encoding(format!(
                "credential id of {} bytes does not fit a u16 length",
                attested.credential_id.len()
            ))
        })?;
        data.extend_from_slice(attested.aaguid);
        data.extend_from_slice(&cred_id_len.to_be_bytes());
        data.extend_from_slice(attested.credential_id);
        data.extend_from_slice(&encode_cose_key(attested.key)?);
    }
    Ok(data)
}

/// Encode a P-256 public key as a COSE_Key CBOR map (kty=2, alg=-7, crv=1, x, y).
/// Entries are written in exactly this order.
pub fn encode_cose_key(key: &AttestedKey) -> Result<Vec<u8>, AssertionFailure> {
    let map = Value::Map(vec![
        (Value::Integer(1i64.into()), Value::Integer(2i64.into())),
        (Value::Integer(3i64.into()), Value::Integer((-7i64).into())),
        (Value::Integer((-1i64).into()), Value::Integer(1i64.into())),
        (Value::Integer((-2i64).into()), Value::Bytes(key.x.to_vec())),
        (Value::Integer((-3i64).into()), Value::Bytes(key.y.to_vec())),
    ]);
    let mut buf = Vec::with_capacity(COSE_KEY_LEN);
    ciborium::into_writer(&map, &mut buf)
        .map_err(|e| AssertionFailure::Encoding(e.to_string()))?;
    Ok(buf)
}
