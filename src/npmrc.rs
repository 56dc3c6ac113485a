//! The `.npmrc` file this tool produces.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::Result;

/// Registry token plus the scope mapping for one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmrcCredential {
    pub registry_host: String,
    pub org: String,
    pub access_token: String,
}

impl NpmrcCredential {
    pub fn new(
        registry_host: impl Into<String>,
        org: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            registry_host: registry_host.into(),
            org: org.into(),
            access_token: access_token.into(),
        }
    }

    pub fn auth_token_line(&self) -> String {
        format!("//{}/:_authToken={}", self.registry_host, self.access_token)
    }

    pub fn scope_registry_line(&self) -> String {
        format!("@{}:registry=https://{}", self.org, self.registry_host)
    }

    /// File contents: both lines, each newline-terminated.
    pub fn render(&self) -> String {
        format!("{}\n{}\n", self.auth_token_line(), self.scope_registry_line())
    }
}

/// Whether anything occupies `path`. Symlinks are not followed, so a dangling
/// link still counts.
pub async fn exists(path: &Path) -> Result<bool> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Create `path` with the credential. Never overwrites an existing file.
pub async fn write(path: &Path, credential: &NpmrcCredential) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(credential.render().as_bytes()).await?;
    file.flush().await?;
    debug!(path = %path.display(), "wrote npmrc");
    Ok(())
}
