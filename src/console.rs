//! Terminal implementation of [`Console`].

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tokio::io::AsyncReadExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::auth::DeviceCodeGrant;
use crate::browser;
use crate::error::Result;
use crate::setup::Console;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Animated progress line on stderr, running until stopped.
pub struct Spinner {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        let (stop, mut stopped) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SPINNER_TICK);
            let mut frame = 0usize;
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let mut err = std::io::stderr();
                        let _ = write!(err, "\r{} {message}", SPINNER_FRAMES[frame].cyan());
                        let _ = err.flush();
                        frame = (frame + 1) % SPINNER_FRAMES.len();
                    }
                }
            }
            let mut err = std::io::stderr();
            let _ = write!(err, "\r\x1b[2K");
            let _ = err.flush();
        });
        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Interactive console on stdin/stdout.
#[derive(Default)]
pub struct TerminalConsole {
    spinner: Option<Spinner>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn show_user_code(&mut self, grant: &DeviceCodeGrant) {
        println!(
            "{} Copy this one-time code: {}",
            "!".yellow(),
            grant.user_code.yellow().bold()
        );
    }

    async fn wait_for_key(&mut self) -> Result<()> {
        print!(
            "- Press {} to continue to {}... ",
            "Enter".yellow(),
            "github.com".yellow()
        );
        std::io::stdout().flush()?;
        let mut byte = [0u8; 1];
        tokio::io::stdin().read(&mut byte).await?;
        Ok(())
    }

    async fn open_browser(&mut self, url: &str) -> bool {
        browser::open_url(url).await
    }

    async fn show_manual_url(&mut self, url: &str) {
        println!("Could not open a web browser. Paste this URL into your browser's address bar:");
        println!("{url}");
    }

    async fn start_waiting(&mut self) {
        if self.spinner.is_none() {
            self.spinner = Some(Spinner::start("Waiting for GitHub authorization..."));
        }
    }

    async fn stop_waiting(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop().await;
        }
    }

    async fn report_existing(&mut self, path: &Path) {
        println!("{} already exists.", path.display().to_string().yellow());
    }

    async fn report_written(&mut self, path: &Path) {
        println!("- Created {}.", path.display().to_string().yellow());
    }
}
