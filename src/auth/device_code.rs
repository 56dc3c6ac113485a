use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::form::{FormResponse, FormTransport};
use super::poll::PollError;
use crate::error::{Result, SetupError};

/// Device and user code pair issued by the device authorization endpoint.
///
/// # Example
/// ```
/// use setup_npmrc::auth::{DeviceCodeGrant, FormResponse};
/// use chrono::Utc;
///
/// let response: FormResponse = [
///     ("device_code", "3584d83530557fdd1f46af8289938c8ef79f9dc5"),
///     ("user_code", "WDJB-MJHT"),
///     ("verification_uri", "https://github.com/login/device"),
///     ("expires_in", "900"),
///     ("interval", "5"),
/// ]
/// .into_iter()
/// .collect();
/// let grant = DeviceCodeGrant::from_response(&response, Utc::now())?;
/// assert_eq!(grant.user_code, "WDJB-MJHT");
/// # Ok::<(), setup_npmrc::SetupError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCodeGrant {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in_secs: u64,
    pub interval_secs: u64,
    pub issued_at: DateTime<Utc>,
}

impl DeviceCodeGrant {
    /// Validate a device-code response. Missing or unparseable fields are errors.
    pub fn from_response(response: &FormResponse, issued_at: DateTime<Utc>) -> Result<Self> {
        let interval_secs = parse_secs(response, "interval")?;
        if interval_secs == 0 {
            return Err(SetupError::malformed_grant("interval", "must be at least 1"));
        }
        Ok(Self {
            device_code: required(response, "device_code")?,
            user_code: required(response, "user_code")?,
            verification_uri: required(response, "verification_uri")?,
            expires_in_secs: parse_secs(response, "expires_in")?,
            interval_secs,
            issued_at,
        })
    }

    /// Delay to honour before every token request.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// When the provider stops accepting this device code, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.expires_in_secs).ok()?;
        self.issued_at
            .checked_add_signed(chrono::Duration::try_seconds(secs)?)
    }
}

fn required(response: &FormResponse, field: &'static str) -> Result<String> {
    match response.value(field) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        Some(_) => Err(SetupError::malformed_grant(field, "is empty")),
        None => Err(SetupError::malformed_grant(field, "is missing")),
    }
}

fn parse_secs(response: &FormResponse, field: &'static str) -> Result<u64> {
    let raw = required(response, field)?;
    raw.trim().parse::<u64>().map_err(|_| {
        SetupError::malformed_grant(field, format!("is not a whole number of seconds: {raw:?}"))
    })
}

/// Ask the device authorization endpoint for a fresh grant.
pub async fn request_grant(
    transport: &dyn FormTransport,
    device_code_url: &str,
    client_id: &str,
    scope: &str,
) -> Result<DeviceCodeGrant> {
    let response = transport
        .post_form(device_code_url, &[("client_id", client_id), ("scope", scope)])
        .await?;
    if let Some(code) = response.value("error").filter(|code| !code.is_empty()) {
        debug!(
            code,
            description = response.get("error_description"),
            "device code request rejected"
        );
        return Err(SetupError::Authorization(PollError::from_code(code)));
    }
    let grant = DeviceCodeGrant::from_response(&response, Utc::now())?;
    debug!(
        expires_in = grant.expires_in_secs,
        interval = grant.interval_secs,
        "device code issued"
    );
    Ok(grant)
}
