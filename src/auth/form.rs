//! URL-encoded request/response transport for the GitHub OAuth endpoints.
//!
//! Both the device-code and access-token endpoints accept a form body and, unless
//! asked for JSON, answer with a form-encoded body for success and error alike.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::{Result, SetupError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decoded `key=value` pairs from a form-encoded response body.
///
/// Lookups follow first-match semantics when a key repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormResponse {
    pairs: Vec<(String, String)>,
}

impl FormResponse {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.value(key).unwrap_or("")
    }

    /// Value for `key` if the body carried it.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormResponse {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Encode fields as an `application/x-www-form-urlencoded` body.
pub fn encode_form(fields: &[(&str, &str)]) -> Result<String> {
    Ok(serde_urlencoded::to_string(fields)?)
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn decode_form(body: &str) -> Result<FormResponse> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
    Ok(FormResponse::new(pairs))
}

/// One POST with a form body, answered by a form body.
#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<FormResponse>;
}

/// [`FormTransport`] over `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpFormClient {
    client: reqwest::Client,
}

impl HttpFormClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FormTransport for HttpFormClient {
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<FormResponse> {
        let body = encode_form(fields)?;
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        let decoded = decode_form(&text)?;
        debug!(url, status = status.as_u16(), keys = decoded.pairs().len(), "form response");

        // GitHub reports OAuth errors in the body, sometimes with a 4xx status.
        // Anything else outside 2xx is not a protocol answer.
        if !status.is_success() && decoded.value("error").is_none() {
            return Err(SetupError::Status {
                status: status.as_u16(),
            });
        }
        Ok(decoded)
    }
}
