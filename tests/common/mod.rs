//! Shared helpers for Flow.IO integration tests.

#![allow(dead_code)]

use flowio::config::ConsoleConfig;
use flowio::device::{DeviceApi, HttpDevice};
use flowio::session::ConsoleSession;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Console configuration pointing at the mock server.
pub fn config_for(server: &MockServer) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.device.base_url = server.uri();
    config.device.timeout_seconds = 2;
    config
}

/// HTTP device talking to the mock server.
pub fn device_for(server: &MockServer) -> Arc<dyn DeviceApi> {
    Arc::new(HttpDevice::with_client(
        &server.uri(),
        reqwest::Client::new(),
        2,
    ))
}

/// Session over HTTP against the mock server.
pub fn session_for(server: &MockServer) -> ConsoleSession {
    ConsoleSession::connect(&config_for(server)).unwrap()
}

/// Mount a JSON answer for `verb path`.
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Minimal acknowledgement envelope.
pub fn ack() -> Value {
    json!({"ok": true})
}
