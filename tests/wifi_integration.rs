//! WiFi scan monitor over HTTP.

mod common;

use common::{ack, mount_json, session_for};
use flowio::polling::PollDecision;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_first_visit_forces_scan_and_lists_networks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/wifi/scan"))
        .and(body_string_contains("force=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack()))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "GET",
        "/api/wifi/scan",
        json!({"ok": true, "running": false, "requested": false, "count": 2, "total_found": 3,
               "networks": [
                   {"ssid": "Office", "secure": true, "rssi": -50},
                   {"ssid": "", "hidden": true},
                   {"ssid": "Garden", "secure": false, "rssi": -80}
               ]}),
    )
    .await;

    let session = session_for(&server);
    let decision = session.wifi.on_page_visible().await;
    assert_eq!(decision, PollDecision::Stop);

    let view = session.wifi.view();
    let ssids: Vec<_> = view.scan.entries.iter().map(|e| e.ssid.as_str()).collect();
    assert!(ssids.contains(&"Office"));
    assert!(ssids.contains(&"Garden"));
    assert_eq!(view.status, "WiFi scan complete: 2 networks shown (3 found).");

    // Later visits refresh passively
    session.wifi.on_page_visible().await;
}

#[tokio::test]
async fn test_scan_endpoint_failure_stops_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wifi/scan"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let decision = session.wifi.refresh_scan_status(false).await;
    assert_eq!(decision, PollDecision::Stop);
    assert!(!session.wifi.is_polling());
    assert!(session.wifi.view().status.starts_with("WiFi scan unavailable"));
}
