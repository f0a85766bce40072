//! Flow.IO composite telemetry (`GET /api/flow/status`).
//!
//! The snapshot is rendered as four cards plus a headline chip. Fields are
//! read leniently: missing values show as `-`.

use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};

use crate::device::{endpoints, lenient::to_bool, DeviceApi, DeviceError};

/// Chip text when the status cannot be read.
pub const STATUS_ERROR_CHIP: &str = "status read error";

/// A titled list of key/value rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCard {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

/// Rendered telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowStatusReport {
    pub chip: String,
    pub link_ok: bool,
    pub cards: Vec<StatusCard>,
    pub raw: Value,
}

/// Format an uptime in milliseconds as `Hh Mm Ss`, `Mm Ss` or `Ss`.
pub fn format_uptime(ms: Option<f64>) -> String {
    let Some(ms) = ms.filter(|ms| ms.is_finite() && *ms >= 0.0) else {
        return "-".to_string();
    };
    let secs = (ms / 1000.0).floor() as u64;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

fn section<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| v.is_object())
}

fn flag(obj: Option<&Value>, key: &str) -> bool {
    obj.and_then(|o| o.get(key)).is_some_and(to_bool)
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn display(obj: Option<&Value>, key: &str) -> String {
    match obj.and_then(|o| o.get(key)) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::Bool(b)) => yes_no(*b),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn text_or_dash(obj: Option<&Value>, key: &str) -> String {
    match obj.and_then(|o| o.get(key)).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}

impl FlowStatusReport {
    /// Build the cards from an `ok` status body.
    pub fn from_value(data: Value) -> Self {
        let root = Some(&data);
        let wifi = section(&data, "wifi");
        let mqtt = section(&data, "mqtt");
        let heap = section(&data, "heap");
        let i2c = section(&data, "i2c");

        let rssi = if flag(wifi, "has_rssi") {
            display(wifi, "rssi_dbm")
        } else {
            "-".to_string()
        };
        let link_ok = flag(i2c, "supervisor_link_ok");

        let cards = vec![
            StatusCard {
                title: "Network",
                rows: vec![
                    ("WiFi connected", yes_no(flag(wifi, "ready"))),
                    ("IP", text_or_dash(wifi, "ip")),
                    ("RSSI (dBm)", rssi),
                    ("MQTT connected", yes_no(flag(mqtt, "ready"))),
                ],
            },
            StatusCard {
                title: "I2C supervisor",
                rows: vec![
                    ("Link active", yes_no(link_ok)),
                    ("Supervisor seen", yes_no(flag(i2c, "supervisor_seen"))),
                    ("Requests", display(i2c, "request_count")),
                    ("Last request (ms)", display(i2c, "last_request_ago_ms")),
                ],
            },
            StatusCard {
                title: "Flow.IO system",
                rows: vec![
                    ("Firmware", text_or_dash(root, "firmware")),
                    (
                        "Uptime",
                        format_uptime(data.get("uptime_ms").and_then(Value::as_f64)),
                    ),
                    ("Free heap", display(heap, "free")),
                    ("Min heap", display(heap, "min")),
                ],
            },
            StatusCard {
                title: "MQTT diagnostics",
                rows: vec![
                    ("RX drop", display(mqtt, "rx_drop")),
                    ("Parse fail", display(mqtt, "parse_fail")),
                    ("Handler fail", display(mqtt, "handler_fail")),
                    ("Oversize drop", display(mqtt, "oversize_drop")),
                ],
            },
        ];

        let chip = if link_ok {
            "Flow.IO online (I2C OK)"
        } else {
            "Flow.IO partial / weak I2C link"
        };

        Self {
            chip: chip.to_string(),
            link_ok,
            cards,
            raw: data,
        }
    }
}

/// Status panel state: either a report or the last error.
pub struct FlowStatusPanel {
    device: Arc<dyn DeviceApi>,
    report: RwLock<Result<FlowStatusReport, String>>,
}

impl FlowStatusPanel {
    pub fn new(device: Arc<dyn DeviceApi>) -> Self {
        Self {
            device,
            report: RwLock::new(Err("not loaded".to_string())),
        }
    }

    /// Latest report, or the error text of the last refresh.
    pub fn report(&self) -> Result<FlowStatusReport, String> {
        self.report.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Chip text for the current state.
    pub fn chip(&self) -> String {
        match self.report() {
            Ok(report) => report.chip,
            Err(_) => STATUS_ERROR_CHIP.to_string(),
        }
    }

    pub async fn refresh(&self) -> Result<FlowStatusReport, DeviceError> {
        let result = self
            .device
            .get_json(endpoints::FLOW_STATUS, &[])
            .await
            .map(FlowStatusReport::from_value);

        let stored = match &result {
            Ok(report) => Ok(report.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read Flow.IO status");
                Err(format!("Error: {}", e))
            }
        };
        *self.report.write().unwrap_or_else(|e| e.into_inner()) = stored;
        result
    }
}
