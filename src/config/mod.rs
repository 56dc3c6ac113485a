//! Run configuration (CLI organization + environment overrides).

use std::path::PathBuf;

use crate::auth::github::{DEFAULT_GITHUB_HOST, GITHUB_CLI_CLIENT_ID, READ_PACKAGES_SCOPE};
use crate::error::{Result, SetupError};

pub const DEFAULT_ORG: &str = "portone-io";
pub const DEFAULT_REGISTRY_HOST: &str = "npm.pkg.github.com";
pub const DEFAULT_OUTPUT: &str = ".npmrc";

pub const ENV_GITHUB_HOST: &str = "SETUP_NPMRC_GITHUB_HOST";
pub const ENV_REGISTRY_HOST: &str = "SETUP_NPMRC_REGISTRY_HOST";
pub const ENV_CLIENT_ID: &str = "SETUP_NPMRC_CLIENT_ID";
pub const ENV_OUTPUT: &str = "SETUP_NPMRC_OUTPUT";

/// Everything a run needs besides the transport and the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    pub org: String,
    pub github_host: String,
    pub registry_host: String,
    pub client_id: String,
    pub scope: String,
    pub output: PathBuf,
}

impl SetupConfig {
    /// Defaults for `org`. Fails if `org` is not a usable npm scope.
    pub fn new(org: &str) -> Result<Self> {
        Ok(Self {
            org: normalize_org(org)?,
            github_host: DEFAULT_GITHUB_HOST.to_string(),
            registry_host: DEFAULT_REGISTRY_HOST.to_string(),
            client_id: GITHUB_CLI_CLIENT_ID.to_string(),
            scope: READ_PACKAGES_SCOPE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        })
    }

    /// Defaults overridden by `SETUP_NPMRC_*` variables (a `.env` file is honoured).
    pub fn from_env(org: &str) -> Result<Self> {
        let _ = dotenvy::dotenv(); // .env is optional
        Self::from_lookup(org, |key| std::env::var(key).ok())
    }

    /// Like [`SetupConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(org: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new(org)?;
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = set(ENV_GITHUB_HOST) {
            config.github_host = validate_host(ENV_GITHUB_HOST, host.trim())?;
        }
        if let Some(host) = set(ENV_REGISTRY_HOST) {
            config.registry_host = validate_host(ENV_REGISTRY_HOST, host.trim())?;
        }
        if let Some(client_id) = set(ENV_CLIENT_ID) {
            config.client_id = client_id.trim().to_string();
        }
        if let Some(output) = set(ENV_OUTPUT) {
            config.output = PathBuf::from(output);
        }
        Ok(config)
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_registry_host(mut self, host: impl Into<String>) -> Self {
        self.registry_host = host.into();
        self
    }
}

/// npm scopes are written as `@org`; accept either form and keep the bare name.
fn normalize_org(org: &str) -> Result<String> {
    let org = org.trim();
    let org = org.strip_prefix('@').unwrap_or(org);
    if org.is_empty() {
        return Err(SetupError::Configuration(
            "organization name is empty".to_string(),
        ));
    }
    if !org
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(SetupError::Configuration(format!(
            "organization name {org:?} may only contain letters, digits, '-', '_' and '.'"
        )));
    }
    Ok(org.to_string())
}

fn validate_host(key: &str, host: &str) -> Result<String> {
    let valid = !host.is_empty()
        && !host.contains("://")
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':'));
    if !valid {
        return Err(SetupError::Configuration(format!(
            "{key} must be a bare host name such as github.com, got {host:?}"
        )));
    }
    Ok(host.to_string())
}
