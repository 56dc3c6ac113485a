mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use setup_npmrc::auth::{GitHubDeviceFlow, HttpFormClient, PollError};
use setup_npmrc::config::SetupConfig;
use setup_npmrc::{run_setup, SetupError, SetupOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{device_code_body, form_body, ConsoleEvent, RecordingConsole, ScriptedTransport};

fn config_in(dir: &tempfile::TempDir) -> SetupConfig {
    SetupConfig::new("acme")
        .expect("config")
        .with_output(dir.path().join(".npmrc"))
}

fn github_flow(server: &MockServer) -> GitHubDeviceFlow {
    GitHubDeviceFlow::new(Arc::new(HttpFormClient::new()))
        .with_device_code_url(format!("{}/login/device/code", server.uri()))
        .with_access_token_url(format!("{}/login/oauth/access_token", server.uri()))
}

#[tokio::test]
async fn existing_file_short_circuits_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    std::fs::write(&config.output, "registry=https://registry.npmjs.org/\n").expect("seed");
    let mut console = RecordingConsole::new(true);

    let outcome = run_setup(&config, &github_flow(&server), &mut console)
        .await
        .expect("setup");

    assert_eq!(outcome, SetupOutcome::AlreadyExists(config.output.clone()));
    assert_eq!(console.events, vec![ConsoleEvent::Existing(config.output.clone())]);
    assert_eq!(
        std::fs::read_to_string(&config.output).expect("read"),
        "registry=https://registry.npmjs.org/\n"
    );
    server.verify().await;
}

#[cfg(unix)]
#[tokio::test]
async fn dangling_symlink_short_circuits_without_network() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push(&[
        ("device_code", "device-code-1"),
        ("user_code", "ABCD-EFGH"),
        ("verification_uri", "https://github.com/login/device"),
        ("expires_in", "900"),
        ("interval", "1"),
    ]);
    transport.push(&[("access_token", "tok"), ("token_type", "bearer")]);
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    std::os::unix::fs::symlink(dir.path().join("shared.npmrc"), &config.output).expect("symlink");
    let mut console = RecordingConsole::new(true);

    let outcome = run_setup(&config, &GitHubDeviceFlow::new(transport.clone()), &mut console)
        .await
        .expect("setup");

    assert_eq!(outcome, SetupOutcome::AlreadyExists(config.output.clone()));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(console.events, vec![ConsoleEvent::Existing(config.output.clone())]);
}

#[tokio::test]
async fn full_flow_writes_npmrc() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_string(device_code_body("1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(form_body(&[("error", "authorization_pending")])),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(form_body(&[
            ("access_token", "abc123"),
            ("token_type", "bearer"),
            ("scope", "read:packages"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    let mut console = RecordingConsole::new(true);

    let outcome = run_setup(&config, &github_flow(&server), &mut console)
        .await
        .expect("setup");

    assert_eq!(outcome, SetupOutcome::Written(config.output.clone()));
    assert_eq!(
        std::fs::read_to_string(&config.output).expect("read"),
        "//npm.pkg.github.com/:_authToken=abc123\n@acme:registry=https://npm.pkg.github.com\n"
    );
    assert_eq!(
        console.events,
        vec![
            ConsoleEvent::UserCode("ABCD-EFGH".to_string()),
            ConsoleEvent::KeyPressed,
            ConsoleEvent::OpenBrowser("https://github.com/login/device".to_string()),
            ConsoleEvent::StartWaiting,
            ConsoleEvent::StopWaiting,
            ConsoleEvent::Written(config.output.clone()),
        ]
    );
    server.verify().await;
}

#[tokio::test(start_paused = true)]
async fn browser_failure_prints_manual_url_and_continues() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push(&[
        ("device_code", "device-code-1"),
        ("user_code", "WXYZ-1234"),
        ("verification_uri", "https://github.com/login/device"),
        ("expires_in", "900"),
        ("interval", "5"),
    ]);
    transport.push(&[
        ("access_token", "tok"),
        ("token_type", "bearer"),
        ("scope", "read:packages"),
    ]);
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir).with_registry_host("npm.ghe.example.com");
    let mut console = RecordingConsole::new(false);

    run_setup(&config, &GitHubDeviceFlow::new(transport.clone()), &mut console)
        .await
        .expect("setup");

    assert_eq!(transport.call_count(), 2);
    assert_eq!(
        console.events[2..4].to_vec(),
        vec![
            ConsoleEvent::OpenBrowser("https://github.com/login/device".to_string()),
            ConsoleEvent::ManualUrl("https://github.com/login/device".to_string()),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(&config.output).expect("read"),
        "//npm.ghe.example.com/:_authToken=tok\n@acme:registry=https://npm.ghe.example.com\n"
    );
}

#[tokio::test(start_paused = true)]
async fn denied_authorization_writes_nothing_and_stops_spinner() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push(&[
        ("device_code", "device-code-1"),
        ("user_code", "ABCD-EFGH"),
        ("verification_uri", "https://github.com/login/device"),
        ("expires_in", "900"),
        ("interval", "5"),
    ]);
    transport.push(&[("error", "access_denied")]);
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    let mut console = RecordingConsole::new(true);

    let err = run_setup(&config, &GitHubDeviceFlow::new(transport.clone()), &mut console)
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::Authorization(PollError::AccessDenied)));
    assert_eq!(console.events.last(), Some(&ConsoleEvent::StopWaiting));
    assert!(!config.output.exists());
}

#[tokio::test]
async fn malformed_grant_fails_before_prompting() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push(&[("device_code", "device-code-1"), ("user_code", "ABCD-EFGH")]);
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(&dir);
    let mut console = RecordingConsole::new(true);

    let err = run_setup(&config, &GitHubDeviceFlow::new(transport.clone()), &mut console)
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::MalformedGrant { .. }));
    assert!(console.events.is_empty());
    assert_eq!(transport.call_count(), 1);
}
