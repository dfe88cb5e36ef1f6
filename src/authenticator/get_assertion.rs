use super::authenticator_data::{AttestedCredentialData, AttestedKey, build_authenticator_data};
use super::crypto::{CryptoProvider, SoftwareCrypto};
use super::signature::p1363_to_der;
use super::{AssertionFailure, AuthenticatorError, CryptoError};
use crate::config::AAGUID;
use crate::credential::{Credential, CounterPolicy, SignCounter, parse_credential_id};
use crate::encoding::base64url_decode;

/// Everything one assertion is computed from.
#[derive(Debug, Clone, Copy)]
pub struct AssertionInputs<'a> {
    pub rp_id:            &'a str,
    pub credential_id:    &'a str,
    pub user_handle:      Option<&'a str>,
    pub counter:          u32,
    pub private_key:      &'a [u8],  // PKCS#8 DER
    pub client_data_hash: &'a [u8],
    pub attested_key:     Option<&'a AttestedKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCredential {
    pub id:          Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAssertionResult {
    pub selected_credential: SelectedCredential,
    pub authenticator_data:  Vec<u8>,
    pub signature:           Vec<u8>,  // DER
}

/// Produce authenticatorData and its DER signature over
/// `authenticatorData || clientDataHash`. Nothing is returned unless every step succeeds.
pub fn generate_assertion<C: CryptoProvider>(
    crypto: &C,
    inputs: &AssertionInputs<'_>,
) -> Result<GetAssertionResult, AssertionFailure> {
    let credential_id = parse_credential_id(inputs.credential_id)?;
    let user_handle = inputs
        .user_handle
        .map(base64url_decode)
        .transpose()
        .map_err(|e| AssertionFailure::InvalidUserHandle(e.to_string()))?;

    let rp_id_hash = crypto.sha256(inputs.rp_id.as_bytes());
    let attested = inputs.attested_key.map(|key| AttestedCredentialData {
        aaguid: &AAGUID,
        credential_id: &credential_id,
        key,
    });
    let authenticator_data =
        build_authenticator_data(&rp_id_hash, inputs.counter, attested.as_ref())?;

    let key = crypto.import_pkcs8(inputs.private_key)?;
    let mut to_sign = authenticator_data.clone();
    to_sign.extend_from_slice(inputs.client_data_hash);
    let raw_sig = crypto.sign_p1363(&key, &to_sign)?;
    let signature = p1363_to_der(&raw_sig)?;

    Ok(GetAssertionResult {
        selected_credential: SelectedCredential {
            id: credential_id,
            user_handle,
        },
        authenticator_data,
        signature,
    })
}

#[derive(Debug, Clone, Default)]
pub struct GetAssertionParams {
    pub rp_id:            String,
    pub client_data_hash: Vec<u8>,
    /// Accepted for completeness; selection never consults it.
    pub allow_list:       Vec<Vec<u8>>,
    pub attested_key:     Option<AttestedKey>,
}

/// Platform authenticator holding exactly one credential and its sign counter.
pub struct Authenticator<C = SoftwareCrypto> {
    crypto: C,
    credential: Credential,
    counter: SignCounter,
}

impl<C: CryptoProvider> Authenticator<C> {
    pub fn new(crypto: C, credential: Credential, policy: CounterPolicy) -> Self {
        let counter = SignCounter::new(policy, credential.counter);
        Self {
            crypto,
            credential,
            counter,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn counter(&self) -> &SignCounter {
        &self.counter
    }

    pub fn get_assertion(
        &self,
        params: &GetAssertionParams,
    ) -> Result<GetAssertionResult, AuthenticatorError> {
        self.assert_selected(params).map_err(|cause| {
            tracing::error!(
                error = %cause,
                "Aborting because of unknown error when asserting credential"
            );
            AuthenticatorError::Unknown(cause)
        })
    }

    fn assert_selected(
        &self,
        params: &GetAssertionParams,
    ) -> Result<GetAssertionResult, AssertionFailure> {
        let cred = &self.credential;
        cred.check_key_type()?;

        if !params.allow_list.is_empty() {
            tracing::debug!(
                entries = params.allow_list.len(),
                "Ignoring allow list, single credential authenticator"
            );
        }
        if params.rp_id != cred.rp_id {
            tracing::warn!(
                requested = %params.rp_id,
                credential = %cred.rp_id,
                "Request rpId differs from the credential's, signing for the credential's"
            );
        }

        let private_key = base64url_decode(&cred.key_value)
            .map_err(|e| CryptoError::KeyImportFailure(format!("key value is not base64url: {e}")))?;

        // The counter value only sticks once the assertion is complete.
        self.counter.with_next(|counter| {
            let result = generate_assertion(
                &self.crypto,
                &AssertionInputs {
                    rp_id: &cred.rp_id,
                    credential_id: &cred.credential_id,
                    user_handle: Some(cred.user_handle.as_str()),
                    counter,
                    private_key: &private_key,
                    client_data_hash: &params.client_data_hash,
                    attested_key: params.attested_key.as_ref(),
                },
            )?;
            tracing::info!(
                rp_id = %cred.rp_id,
                counter,
                policy = ?self.counter.policy(),
                "Assertion signed"
            );
            Ok(result)
        })
    }
}
