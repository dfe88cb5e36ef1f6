use std::path::PathBuf;

use crate::credential::CounterPolicy;
use crate::relying_party::cognito::DEFAULT_COGNITO_URL;

pub const AAGUID: [u8; 16] = [
    0x7a, 0x1e, 0x5c, 0x02, 0x94, 0x3b, 0x4d, 0x6f, 0xa8, 0x51, 0x0c, 0xe2, 0x00, 0x00, 0x00, 0x01,
];
pub const APP_NAME: &str = "passkey-emu";
pub const CREDENTIAL_FILE_NAME: &str = "credential.json";
pub const DEFAULT_BASE_URL: &str = "https://au.api.authsignal.com/v1";
pub const DEFAULT_ORIGIN: &str = "https://app.simplicity.kiwi";
pub const DEFAULT_ACTION: &str = "cognitoAuth";

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Credential JSON (single passkey or Bitwarden login export).
    /// Defaults to `credential.json` in the user config directory.
    #[arg(long)]
    pub credential: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    #[arg(long)]
    pub tenant_id: Option<String>,
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,
    #[arg(long, default_value = DEFAULT_ACTION)]
    pub action: String,
    #[arg(long, value_enum, default_value_t = CounterPolicy::Fixed)]
    pub counter: CounterPolicy,
    /// Device id reported to the relying party. A random UUID when omitted.
    #[arg(long)]
    pub device_id: Option<String>,
    /// Sign this challenge locally, print the assertion, and exit without any network calls.
    #[arg(long)]
    pub challenge: Option<String>,
    /// rpId the --challenge request claims. Only the credential's own rpId is
    /// ever signed; a different value just logs a mismatch warning.
    #[arg(long, requires = "challenge")]
    pub rp_id: Option<String>,
    /// Cognito app client id. When set, the passkey access token is exchanged
    /// for Cognito tokens through CUSTOM_AUTH.
    #[arg(long)]
    pub cognito_client_id: Option<String>,
    #[arg(long, default_value = DEFAULT_COGNITO_URL)]
    pub cognito_url: String,
    /// Cognito username; defaults to the credential's userName.
    #[arg(long, requires = "cognito_client_id")]
    pub cognito_username: Option<String>,
}

impl Config {
    pub fn credential_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.credential {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("cannot determine XDG config dir"))?;
        Ok(dirs.config_dir().join(CREDENTIAL_FILE_NAME))
    }

    /// Local mode signs `--challenge` without talking to the relying party.
    pub fn is_local(&self) -> bool {
        self.challenge.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cfg = Config::parse_from(["passkey-emu", "--tenant-id", "t"]);
        assert_eq!(cfg.verbose, 0);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.origin, DEFAULT_ORIGIN);
        assert_eq!(cfg.action, DEFAULT_ACTION);
        assert_eq!(cfg.counter, CounterPolicy::Fixed);
        assert_eq!(cfg.cognito_url, DEFAULT_COGNITO_URL);
        assert!(cfg.cognito_client_id.is_none());
        assert!(!cfg.is_local());
    }

    #[test]
    fn test_cognito_flags() {
        let cfg = Config::parse_from([
            "passkey-emu",
            "--tenant-id",
            "t",
            "--cognito-client-id",
            "kvoiu7unft0c8hqqsa6hkmeu5",
            "--cognito-username",
            "someone@example.com",
        ]);
        assert_eq!(cfg.cognito_client_id.as_deref(), Some("kvoiu7unft0c8hqqsa6hkmeu5"));
        assert_eq!(cfg.cognito_username.as_deref(), Some("someone@example.com"));
        assert!(
            Config::try_parse_from(["passkey-emu", "--cognito-username", "x"]).is_err(),
            "a username without a client id is meaningless"
        );
    }

    #[test]
    fn test_counter_and_local_mode() {
        let cfg = Config::parse_from([
            "passkey-emu",
            "-vv",
            "--counter",
            "clock",
            "--credential",
            "/tmp/cred.json",
            "--challenge",
            "abc",
            "--rp-id",
            "example.com",
        ]);
        assert_eq!(cfg.verbose, 2);
        assert_eq!(cfg.counter, CounterPolicy::MonotonicClock);
        assert!(cfg.is_local());
        assert_eq!(cfg.credential_path().unwrap(), PathBuf::from("/tmp/cred.json"));
    }

    #[test]
    fn test_rp_id_requires_challenge() {
        assert!(Config::try_parse_from(["passkey-emu", "--rp-id", "example.com"]).is_err());
    }
}
