//! Access-token polling for an issued device code.

use std::fmt;

use tracing::{debug, info};

use super::device_code::DeviceCodeGrant;
use super::form::{FormResponse, FormTransport};
use crate::error::{Result, SetupError};

pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Token issued once the user approves the device code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResult {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
}

/// Error code returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    Pending,
    SlowDown,
    ExpiredToken,
    AccessDenied,
    Other(String),
}

impl PollError {
    pub fn from_code(code: &str) -> Self {
        match code {
            "authorization_pending" => Self::Pending,
            "slow_down" => Self::SlowDown,
            "expired_token" => Self::ExpiredToken,
            "access_denied" => Self::AccessDenied,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Pending => "authorization_pending",
            Self::SlowDown => "slow_down",
            Self::ExpiredToken => "expired_token",
            Self::AccessDenied => "access_denied",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of a single token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Authorized(TokenResult),
    Failed(PollError),
}

/// Classify a token endpoint response.
///
/// An `error` field wins over anything else in the body. Without one the body is a
/// token and must at least carry `access_token`.
pub fn classify(response: &FormResponse) -> Result<PollOutcome> {
    if let Some(code) = response.value("error").filter(|code| !code.is_empty()) {
        return Ok(PollOutcome::Failed(PollError::from_code(code)));
    }
    let access_token = response.get("access_token");
    if access_token.is_empty() {
        return Err(SetupError::MalformedResponse(
            "response carried neither an error nor an access_token".to_string(),
        ));
    }
    Ok(PollOutcome::Authorized(TokenResult {
        access_token: access_token.to_string(),
        token_type: response.get("token_type").to_string(),
        scope: response.get("scope").to_string(),
    }))
}

/// Issue one token request for `grant`, without sleeping first.
pub async fn poll_once(
    transport: &dyn FormTransport,
    access_token_url: &str,
    client_id: &str,
    grant: &DeviceCodeGrant,
) -> Result<PollOutcome> {
    let response = transport
        .post_form(
            access_token_url,
            &[
                ("client_id", client_id),
                ("device_code", grant.device_code.as_str()),
                ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ],
        )
        .await?;
    let outcome = classify(&response)?;
    if let PollOutcome::Failed(err) = &outcome {
        debug!(
            code = err.code(),
            description = response.get("error_description"),
            "token not issued"
        );
    }
    Ok(outcome)
}

/// Poll until the provider issues a token or answers with a terminal error.
///
/// Sleeps the grant's interval before every request. `authorization_pending` keeps
/// the loop going at the same interval; any other error code ends it. The device
/// code's expiry is only reported: the provider is relied on to answer
/// `expired_token` once it lapses.
pub async fn poll_until_complete(
    transport: &dyn FormTransport,
    access_token_url: &str,
    client_id: &str,
    grant: &DeviceCodeGrant,
) -> Result<TokenResult> {
    let interval = grant.interval();
    let expires_at = grant.expires_at();
    let mut attempts: u32 = 0;

    loop {
        tokio::time::sleep(interval).await;
        attempts += 1;

        match poll_once(transport, access_token_url, client_id, grant).await? {
            PollOutcome::Authorized(token) => {
                info!(attempts, token_type = %token.token_type, "device authorization granted");
                return Ok(token);
            }
            PollOutcome::Failed(PollError::Pending) => {
                // Runs under the spinner, so nothing here may reach the default log level.
                let past_expiry = expires_at.is_some_and(|at| chrono::Utc::now() > at);
                debug!(attempts, past_expiry, "authorization pending");
            }
            PollOutcome::Failed(err) => {
                debug!(attempts, code = err.code(), "device authorization ended");
                return Err(SetupError::Authorization(err));
            }
        }
    }
}
