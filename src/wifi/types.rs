//! WiFi payloads and list rendering.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::device::lenient;

/// Display bound for a scan-list label, in characters.
pub const MAX_LABEL_LEN: usize = 56;

/// One network reported by the scanner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub ssid: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub hidden: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub secure: bool,
    #[serde(default, deserialize_with = "lenient::count")]
    pub rssi: Option<i64>,
}

impl NetworkInfo {
    /// Whether the network can be offered for selection.
    pub fn is_listed(&self) -> bool {
        !self.ssid.is_empty() && !self.hidden
    }

    /// `"<ssid> (secure|open)[ <rssi> dBm]"`, truncated to [`MAX_LABEL_LEN`].
    pub fn label(&self) -> String {
        let mut label = self.ssid.clone();
        label.push_str(if self.secure { " (secure)" } else { " (open)" });
        if let Some(rssi) = self.rssi {
            label.push_str(&format!(" {} dBm", rssi));
        }
        truncate_label(&label)
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_LEN {
        return label.to_string();
    }
    let mut out: String = label.chars().take(MAX_LABEL_LEN - 1).collect();
    out.push('…');
    out
}

/// `GET /api/wifi/scan`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanStatus {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub running: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub requested: bool,
    #[serde(default, deserialize_with = "lenient::count")]
    pub count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_found: Option<i64>,
    #[serde(default, deserialize_with = "network_list")]
    pub networks: Vec<NetworkInfo>,
}

impl ScanStatus {
    /// A scan is underway or queued on the device.
    pub fn is_active(&self) -> bool {
        self.running || self.requested
    }

    /// Human status line for a successful fetch.
    pub fn summary(&self) -> String {
        let count = self.count.unwrap_or(0);
        let total = self.total_found.unwrap_or(count);
        if self.is_active() {
            "WiFi scan in progress...".to_string()
        } else if count > 0 {
            format!(
                "WiFi scan complete: {} networks shown ({} found).",
                count, total
            )
        } else {
            "No visible network detected.".to_string()
        }
    }
}

/// Networks array; a non-array becomes empty and bad entries are dropped.
fn network_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<NetworkInfo>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// One selectable entry of the scan list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    /// Full SSID, used for selection
    pub ssid: String,
    /// Display text, possibly truncated
    pub label: String,
}

/// Rendered scan list. An empty selection means manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScanList {
    pub entries: Vec<ScanEntry>,
    pub selected: String,
}

impl ScanList {
    /// Build the list from scan results.
    ///
    /// Selection prefers the typed SSID, then the previous selection, then
    /// manual entry.
    pub fn render(networks: &[NetworkInfo], typed_ssid: &str, previous: &str) -> Self {
        let entries: Vec<ScanEntry> = networks
            .iter()
            .filter(|n| n.is_listed())
            .map(|n| ScanEntry {
                ssid: n.ssid.clone(),
                label: n.label(),
            })
            .collect();

        let typed = typed_ssid.trim();
        let contains = |ssid: &str| !ssid.is_empty() && entries.iter().any(|e| e.ssid == ssid);
        let selected = if contains(typed) {
            typed.to_string()
        } else if contains(previous) {
            previous.to_string()
        } else {
            String::new()
        };

        Self { entries, selected }
    }

    pub fn contains(&self, ssid: &str) -> bool {
        self.entries.iter().any(|e| e.ssid == ssid)
    }
}

/// WiFi station credentials (`/api/wifi/config`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WifiSettings {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ssid: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pass: String,
}

impl WifiSettings {
    /// Form body for saving. The SSID is trimmed, the password is not.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("enabled", if self.enabled { "1" } else { "0" }.to_string()),
            ("ssid", self.ssid.trim().to_string()),
            ("pass", self.pass.clone()),
        ]
    }
}
