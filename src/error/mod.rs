//! Error types for setup-npmrc.

use thiserror::Error;

use crate::auth::PollError;

/// Primary error type for every step of the setup.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}")]
    Status { status: u16 },

    #[error("Form codec error: {0}")]
    Codec(String),

    #[error("Malformed device code response: `{field}` {reason}")]
    MalformedGrant { field: &'static str, reason: String },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    #[error("Authorization failed: {0}")]
    Authorization(PollError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SetupError {
    pub(crate) fn malformed_grant(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedGrant {
            field,
            reason: reason.into(),
        }
    }

    /// Short user-facing guidance for the terminal, if there is any to give.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::Authorization(PollError::AccessDenied) => {
                Some("The request was denied in the browser. Run setup-npmrc again to retry.")
            }
            Self::Authorization(PollError::ExpiredToken) => {
                Some("The one-time code expired before it was entered. Run setup-npmrc again.")
            }
            Self::Authorization(PollError::SlowDown) => {
                Some("GitHub asked to poll more slowly. Wait a minute and run setup-npmrc again.")
            }
            Self::Network(_) | Self::Status { .. } => {
                Some("Check your network connection and that github.com is reachable.")
            }
            Self::Configuration(_) => {
                Some("Check the SETUP_NPMRC_* environment variables and the --org value.")
            }
            _ => None,
        }
    }
}

impl From<serde_urlencoded::ser::Error> for SetupError {
    fn from(error: serde_urlencoded::ser::Error) -> Self {
        Self::Codec(error.to_string())
    }
}

impl From<serde_urlencoded::de::Error> for SetupError {
    fn from(error: serde_urlencoded::de::Error) -> Self {
        Self::Codec(error.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SetupError>;
