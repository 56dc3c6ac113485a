//! OAuth device authorization against GitHub, over form-encoded HTTP.

pub mod device_code;
pub mod form;
pub mod github;
pub mod poll;

pub use device_code::{request_grant, DeviceCodeGrant};
pub use form::{decode_form, encode_form, FormResponse, FormTransport, HttpFormClient};
pub use github::GitHubDeviceFlow;
pub use poll::{classify, poll_once, poll_until_complete, PollError, PollOutcome, TokenResult};
