//! setup-npmrc
//!
//! Signs in to GitHub with the OAuth device flow and writes an `.npmrc` that points
//! an organization's npm scope at GitHub Packages.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use setup_npmrc::auth::{GitHubDeviceFlow, HttpFormClient};
//! use setup_npmrc::config::SetupConfig;
//! use setup_npmrc::console::TerminalConsole;
//!
//! # async fn example() -> setup_npmrc::Result<()> {
//! let config = SetupConfig::from_env("acme")?;
//! let flow = GitHubDeviceFlow::from_config(Arc::new(HttpFormClient::new()), &config);
//! let outcome = setup_npmrc::setup::run_setup(&config, &flow, &mut TerminalConsole::new()).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod browser;
pub mod config;
pub mod console;
pub mod error;
pub mod npmrc;
pub mod setup;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, SetupError};
pub use setup::{run_setup, Console, SetupOutcome};
