#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use setup_npmrc::auth::{encode_form, DeviceCodeGrant, FormResponse, FormTransport};
use setup_npmrc::{Console, Result, SetupError};
use tokio::time::Instant;

/// One request seen by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub at: Instant,
}

impl RecordedCall {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport answering from a queue of canned form bodies.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<FormResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, pairs: &[(&str, &str)]) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(pairs.iter().copied().collect());
    }

    pub fn push_pending(&self, times: usize) {
        for _ in 0..times {
            self.push(&[("error", "authorization_pending")]);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }
}

#[async_trait]
impl FormTransport for ScriptedTransport {
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<FormResponse> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(RecordedCall {
                url: url.to_string(),
                fields: fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                at: Instant::now(),
            });
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .ok_or_else(|| SetupError::MalformedResponse("script exhausted".to_string()))
    }
}

pub fn grant(interval_secs: u64) -> DeviceCodeGrant {
    DeviceCodeGrant {
        device_code: "device-code-1".to_string(),
        user_code: "ABCD-EFGH".to_string(),
        verification_uri: "https://github.com/login/device".to_string(),
        expires_in_secs: 900,
        interval_secs,
        issued_at: Utc::now(),
    }
}

pub fn form_body(pairs: &[(&str, &str)]) -> String {
    encode_form(pairs).expect("encode form body")
}

pub fn device_code_body(interval: &str) -> String {
    form_body(&[
        ("device_code", "device-code-1"),
        ("user_code", "ABCD-EFGH"),
        ("verification_uri", "https://github.com/login/device"),
        ("expires_in", "900"),
        ("interval", interval),
    ])
}

/// Everything the orchestrator asked the console to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    UserCode(String),
    KeyPressed,
    OpenBrowser(String),
    ManualUrl(String),
    StartWaiting,
    StopWaiting,
    Existing(PathBuf),
    Written(PathBuf),
}

pub struct RecordingConsole {
    pub events: Vec<ConsoleEvent>,
    pub browser_opens: bool,
}

impl RecordingConsole {
    pub fn new(browser_opens: bool) -> Self {
        Self {
            events: Vec::new(),
            browser_opens,
        }
    }
}

#[async_trait]
impl Console for RecordingConsole {
    async fn show_user_code(&mut self, grant: &DeviceCodeGrant) {
        self.events.push(ConsoleEvent::UserCode(grant.user_code.clone()));
    }

    async fn wait_for_key(&mut self) -> Result<()> {
        self.events.push(ConsoleEvent::KeyPressed);
        Ok(())
    }

    async fn open_browser(&mut self, url: &str) -> bool {
        self.events.push(ConsoleEvent::OpenBrowser(url.to_string()));
        self.browser_opens
    }

    async fn show_manual_url(&mut self, url: &str) {
        self.events.push(ConsoleEvent::ManualUrl(url.to_string()));
    }

    async fn start_waiting(&mut self) {
        self.events.push(ConsoleEvent::StartWaiting);
    }

    async fn stop_waiting(&mut self) {
        self.events.push(ConsoleEvent::StopWaiting);
    }

    async fn report_existing(&mut self, path: &Path) {
        self.events.push(ConsoleEvent::Existing(path.to_path_buf()));
    }

    async fn report_written(&mut self, path: &Path) {
        self.events.push(ConsoleEvent::Written(path.to_path_buf()));
    }
}
