//! Opening the verification page in the user's browser.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::debug;

const LINUX_OPENERS: [&str; 3] = ["xdg-open", "x-www-browser", "wslview"];
const LINUX_FALLBACK: &str = "sensible-browser";

/// Command (program + leading args) that opens a URL on `os`, as named by
/// `std::env::consts::OS`. The URL is appended by the caller.
pub fn launch_command(os: &str, find: impl Fn(&str) -> Option<PathBuf>) -> Vec<String> {
    match os {
        "macos" => vec!["open".to_string()],
        "windows" => vec!["cmd".to_string(), "/c".to_string(), "start".to_string()],
        _ => {
            let program = LINUX_OPENERS
                .iter()
                .copied()
                .find_map(&find)
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_else(|| LINUX_FALLBACK.to_string());
            vec![program]
        }
    }
}

/// Locate `command` on `PATH`, trying each `PATHEXT` suffix where that is set.
pub fn find_in_path(command: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    let exts: Vec<String> = match std::env::var("PATHEXT") {
        Ok(exts) => exts
            .split(';')
            .map(str::to_string)
            .chain(std::iter::once(String::new()))
            .collect(),
        Err(_) => vec![String::new()],
    };
    std::env::split_paths(&path).find_map(|dir| find_in_dir(&dir, command, &exts))
}

fn find_in_dir(dir: &Path, command: &str, exts: &[String]) -> Option<PathBuf> {
    exts.iter()
        .map(|ext| dir.join(format!("{command}{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Try to open `url`. Returns whether the launcher reported success.
pub async fn open_url(url: &str) -> bool {
    let command = launch_command(std::env::consts::OS, find_in_path);
    let Some((program, args)) = command.split_first() else {
        return false;
    };
    let status = tokio::process::Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) => {
            debug!(%program, %status, "browser launcher exited");
            status.success()
        }
        Err(error) => {
            debug!(%program, %error, "browser launcher failed to start");
            false
        }
    }
}
