use super::{PasskeyAuthResult, RelyingPartyClient};
use crate::authenticator::CryptoProvider;
use crate::client::{AssertCredentialParams, Fido2Client, UserVerification};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct LoginOptions<'a> {
    pub origin: &'a str,
    pub action: &'a str,
    pub device_id: &'a str,
}

/// Full passkey sign-in: challenge, request options, local assertion, verification.
pub async fn login<C: CryptoProvider>(
    rp: &RelyingPartyClient,
    client: &Fido2Client<C>,
    opts: &LoginOptions<'_>,
) -> Result<PasskeyAuthResult> {
    let challenge_id = rp.request_challenge(opts.action).await?;
    tracing::info!(challenge_id = %challenge_id, "Challenge issued");

    let options = rp.authentication_options(&challenge_id).await?.options;
    tracing::info!(
        rp_id = %options.rp_id,
        timeout = ?options.timeout,
        user_verification = ?options.user_verification,
        "Authentication options received"
    );

    let assertion = client.assert_credential(&AssertCredentialParams {
        allowed_credential_ids: options.allowed_credential_ids(),
        rp_id: options.rp_id,
        origin: opts.origin.to_string(),
        challenge: options.challenge,
        user_verification: UserVerification::Preferred,
    })?;

    let result = rp
        .present_passkey(&challenge_id, &assertion, opts.device_id)
        .await?;
    tracing::info!(
        verified = result.is_verified,
        user_id = ?result.user_id,
        "Passkey verification finished"
    );
    Ok(result)
}
