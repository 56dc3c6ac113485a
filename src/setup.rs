//! The end-to-end setup: device flow in, `.npmrc` out.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::{DeviceCodeGrant, GitHubDeviceFlow};
use crate::config::SetupConfig;
use crate::error::Result;
use crate::npmrc::{self, NpmrcCredential};

/// User-facing side of the setup.
#[async_trait]
pub trait Console: Send {
    /// Show the one-time code the user has to type into the browser.
    async fn show_user_code(&mut self, grant: &DeviceCodeGrant);

    /// Block until the user acknowledges with a key press.
    async fn wait_for_key(&mut self) -> Result<()>;

    /// Open the verification page. `false` means the user must open it by hand.
    async fn open_browser(&mut self, url: &str) -> bool;

    /// Tell the user to open `url` themselves.
    async fn show_manual_url(&mut self, url: &str);

    async fn start_waiting(&mut self);

    async fn stop_waiting(&mut self);

    async fn report_existing(&mut self, path: &Path);

    async fn report_written(&mut self, path: &Path);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The output file was already there; nothing was requested or written.
    AlreadyExists(PathBuf),
    Written(PathBuf),
}

/// Run the whole setup for `config`.
pub async fn run_setup(
    config: &SetupConfig,
    flow: &GitHubDeviceFlow,
    console: &mut dyn Console,
) -> Result<SetupOutcome> {
    let output = config.output.as_path();
    if npmrc::exists(output).await? {
        info!(path = %output.display(), "output already exists, skipping");
        console.report_existing(output).await;
        return Ok(SetupOutcome::AlreadyExists(output.to_path_buf()));
    }

    let grant = flow.start_device_code().await?;
    console.show_user_code(&grant).await;
    console.wait_for_key().await?;

    if !console.open_browser(&grant.verification_uri).await {
        debug!(url = %grant.verification_uri, "falling back to manual browser navigation");
        console.show_manual_url(&grant.verification_uri).await;
    }

    console.start_waiting().await;
    let token = flow.wait_for_token(&grant).await;
    console.stop_waiting().await;
    let token = token?;

    let credential = NpmrcCredential::new(&config.registry_host, &config.org, token.access_token);
    npmrc::write(output, &credential).await?;
    info!(path = %output.display(), org = %config.org, "npmrc created");
    console.report_written(output).await;
    Ok(SetupOutcome::Written(output.to_path_buf()))
}
