use crate::authenticator::{CryptoProvider, SoftwareCrypto};
use crate::config::Config;
use crate::credential::{Credential, load_credential, parse_credential_id};
use crate::encoding::base64url_decode;

pub fn check(cfg: &Config) -> anyhow::Result<()> {
    let mut errors: Vec<String> = Vec::new();

    // Check 1: credential file loads and its key material is usable
    match cfg.credential_path() {
        Ok(path) => match load_credential(&path) {
            Ok(credential) => errors.extend(check_credential(&credential)),
            Err(e) => errors.push(format!(
                "cannot load credential {}: {e}\n  \
                 → pass --credential or place the passkey JSON at that path",
                path.display()
            )),
        },
        Err(e) => errors.push(format!("{e}\n  → pass --credential explicitly")),
    }

    // Check 2: relying party settings, unless only signing locally
    if !cfg.is_local() {
        if let Err(e) = reqwest::Url::parse(&cfg.base_url) {
            errors.push(format!("invalid --base-url '{}': {e}", cfg.base_url));
        }
        if cfg.tenant_id.as_deref().is_none_or(str::is_empty) {
            errors.push(
                "missing --tenant-id\n  → required for the relying party's Basic authorization"
                    .to_string(),
            );
        }
    }

    // Check 3: Cognito exchange settings
    if cfg.cognito_client_id.is_some() {
        if cfg.is_local() {
            errors.push(
                "--cognito-client-id has no effect with --challenge\n  \
                 → drop --challenge to run the full login"
                    .to_string(),
            );
        }
        if let Err(e) = reqwest::Url::parse(&cfg.cognito_url) {
            errors.push(format!("invalid --cognito-url '{}': {e}", cfg.cognito_url));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        tracing::error!("{err}");
    }
    anyhow::bail!("{} preflight check(s) failed", errors.len());
}

/// Problems that would make every assertion with this credential fail.
pub fn check_credential(credential: &Credential) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(e) = parse_credential_id(&credential.credential_id) {
        errors.push(e.to_string());
    }
    if let Err(e) = base64url_decode(&credential.user_handle) {
        errors.push(format!("userHandle is not base64url: {e}"));
    }
    match base64url_decode(&credential.key_value) {
        Ok(der) => {
            if let Err(e) = SoftwareCrypto.import_pkcs8(&der) {
                errors.push(e.to_string());
            }
        }
        Err(e) => errors.push(format!("keyValue is not base64url: {e}")),
    }
    errors
}
