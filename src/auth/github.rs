use std::sync::Arc;

use super::device_code::{request_grant, DeviceCodeGrant};
use super::form::FormTransport;
use super::poll::{poll_once, poll_until_complete, PollOutcome, TokenResult};
use crate::config::SetupConfig;
use crate::error::Result;

/// Public OAuth app id of the GitHub CLI.
pub const GITHUB_CLI_CLIENT_ID: &str = "178c6fc778ccc68e1d6a";
pub const DEFAULT_GITHUB_HOST: &str = "github.com";
pub const READ_PACKAGES_SCOPE: &str = "read:packages";

pub fn device_code_url(host: &str) -> String {
    format!("https://{host}/login/device/code")
}

pub fn access_token_url(host: &str) -> String {
    format!("https://{host}/login/oauth/access_token")
}

/// GitHub device-code flow over a [`FormTransport`].
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use setup_npmrc::auth::{GitHubDeviceFlow, HttpFormClient};
///
/// # async fn run() -> setup_npmrc::Result<()> {
/// let flow = GitHubDeviceFlow::new(Arc::new(HttpFormClient::new()));
/// let grant = flow.start_device_code().await?;
/// println!("Enter {} at {}", grant.user_code, grant.verification_uri);
/// let token = flow.wait_for_token(&grant).await?;
/// # let _ = token;
/// # Ok(())
/// # }
/// ```
pub struct GitHubDeviceFlow {
    transport: Arc<dyn FormTransport>,
    client_id: String,
    scope: String,
    device_code_url: String,
    access_token_url: String,
}

impl GitHubDeviceFlow {
    pub fn new(transport: Arc<dyn FormTransport>) -> Self {
        Self::for_host(transport, DEFAULT_GITHUB_HOST)
    }

    pub fn for_host(transport: Arc<dyn FormTransport>, host: &str) -> Self {
        Self {
            transport,
            client_id: GITHUB_CLI_CLIENT_ID.to_string(),
            scope: READ_PACKAGES_SCOPE.to_string(),
            device_code_url: device_code_url(host),
            access_token_url: access_token_url(host),
        }
    }

    pub fn from_config(transport: Arc<dyn FormTransport>, config: &SetupConfig) -> Self {
        Self::for_host(transport, &config.github_host)
            .with_client_id(config.client_id.clone())
            .with_scope(config.scope.clone())
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub async fn start_device_code(&self) -> Result<DeviceCodeGrant> {
        request_grant(
            self.transport.as_ref(),
            &self.device_code_url,
            &self.client_id,
            &self.scope,
        )
        .await
    }

    /// Single token request; callers own the pacing.
    pub async fn poll_device_code(&self, grant: &DeviceCodeGrant) -> Result<PollOutcome> {
        poll_once(
            self.transport.as_ref(),
            &self.access_token_url,
            &self.client_id,
            grant,
        )
        .await
    }

    pub async fn wait_for_token(&self, grant: &DeviceCodeGrant) -> Result<TokenResult> {
        poll_until_complete(
            self.transport.as_ref(),
            &self.access_token_url,
            &self.client_id,
            grant,
        )
        .await
    }
}
