//! CLI entry point for setup-npmrc.

use std::sync::Arc;

use clap::Parser;

use crate::auth::{GitHubDeviceFlow, HttpFormClient};
use crate::config::{SetupConfig, DEFAULT_ORG};
use crate::console::TerminalConsole;
use crate::error::Result;
use crate::setup::{run_setup, SetupOutcome};

/// Create an .npmrc that installs packages from GitHub Packages.
#[derive(Parser, Debug)]
#[command(name = "setup-npmrc", version, about = "Create an .npmrc for GitHub Packages")]
pub struct Cli {
    /// GitHub organization that owns the packages
    #[arg(short = 'O', long, default_value = DEFAULT_ORG)]
    pub org: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Wire the real transport and terminal together and run the setup.
pub async fn run(cli: Cli) -> Result<SetupOutcome> {
    let config = SetupConfig::from_env(&cli.org)?;
    let flow = GitHubDeviceFlow::from_config(Arc::new(HttpFormClient::new()), &config);
    let mut console = TerminalConsole::new();
    run_setup(&config, &flow, &mut console).await
}
