pub mod authenticator;
pub mod client;
pub mod config;
pub mod credential;
pub mod diagnostics;
pub mod encoding;
pub mod error;
pub mod relying_party;

use std::path::Path;

pub use authenticator::{Authenticator, SoftwareCrypto};
pub use client::Fido2Client;
pub use error::{Error, Result};

use client::AssertCredentialParams;
use credential::CounterPolicy;
use relying_party::{CognitoClient, LoginOptions, RelyingPartyClient};

/// Load the credential at `path` into a client backed by an in-process key.
pub fn load_client(path: &Path, policy: CounterPolicy) -> Result<Fido2Client> {
    let credential = credential::load_credential(path)?;
    Ok(Fido2Client::new(Authenticator::new(
        SoftwareCrypto,
        credential,
        policy,
    )))
}

pub async fn run(cfg: config::Config) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    let level = match cfg.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting passkey-emu");

    // Preflight checks
    diagnostics::check(&cfg)?;

    let path = cfg.credential_path()?;
    let client = load_client(&path, cfg.counter)?;
    let credential = client.authenticator().credential();
    tracing::info!(
        rp_id = %credential.rp_id,
        user = ?credential.user_name,
        counter = ?cfg.counter,
        "Credential ready"
    );

    if let Some(challenge) = &cfg.challenge {
        let rp_id = cfg.rp_id.clone().unwrap_or_else(|| credential.rp_id.clone());
        let assertion = client.assert_credential(&AssertCredentialParams {
            rp_id,
            origin: cfg.origin.clone(),
            challenge: challenge.clone(),
            ..Default::default()
        })?;
        println!("{}", serde_json::to_string_pretty(&assertion)?);
        return Ok(());
    }

    let tenant_id = cfg
        .tenant_id
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--tenant-id is required"))?;
    let device_id = cfg
        .device_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    tracing::info!(device_id = %device_id, base_url = %cfg.base_url, "Signing in");

    let rp = RelyingPartyClient::new(&cfg.base_url, tenant_id);
    let result = relying_party::login(
        &rp,
        &client,
        &LoginOptions {
            origin: &cfg.origin,
            action: &cfg.action,
            device_id: &device_id,
        },
    )
    .await?;
    if !result.is_verified {
        anyhow::bail!("relying party did not verify the passkey");
    }

    let Some(client_id) = cfg.cognito_client_id.as_deref() else {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    };
    let access_token = result
        .access_token
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("verified passkey came back without an access token"))?;
    let username = cfg
        .cognito_username
        .as_deref()
        .or(credential.user_name.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!("--cognito-username is required when the credential has no userName")
        })?;
    tracing::info!(username = %username, "Exchanging passkey token with Cognito");

    let cognito = CognitoClient::new(&cfg.cognito_url, client_id);
    let tokens = relying_party::cognito_login(&cognito, username, &device_id, access_token)
        .await?;
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(())
}
