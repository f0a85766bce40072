//! Firmware-update payloads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::device::endpoints;
use crate::device::lenient;

/// Remote update state. The client only mirrors it.
///
/// A state name the client does not know is kept verbatim in
/// [`UpgradeState::Other`] so it can still be shown; only a missing or
/// empty state is [`UpgradeState::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpgradeState {
    Idle,
    Queued,
    Running,
    Done,
    Error,
    Other(String),
    #[default]
    Unknown,
}

impl UpgradeState {
    /// Parse the `state` field as sent by the device.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "" => UpgradeState::Unknown,
            "idle" => UpgradeState::Idle,
            "queued" => UpgradeState::Queued,
            "running" => UpgradeState::Running,
            "done" => UpgradeState::Done,
            "error" => UpgradeState::Error,
            other => UpgradeState::Other(other.to_string()),
        }
    }

    /// Name on the wire (`unknown` when the device sent none).
    pub fn as_wire(&self) -> &str {
        match self {
            UpgradeState::Idle => "idle",
            UpgradeState::Queued => "queued",
            UpgradeState::Running => "running",
            UpgradeState::Done => "done",
            UpgradeState::Error => "error",
            UpgradeState::Other(raw) => raw,
            UpgradeState::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            UpgradeState::Idle => "inactive",
            UpgradeState::Queued => "queued",
            UpgradeState::Running => "running",
            UpgradeState::Done => "done",
            UpgradeState::Error => "error",
            UpgradeState::Other(raw) => raw,
            UpgradeState::Unknown => "unknown",
        }
    }
}

impl Serialize for UpgradeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for UpgradeState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(UpgradeState::from_wire(raw.trim()))
    }
}

/// `GET /api/fwupdate/status`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UpgradeStatus {
    #[serde(default)]
    pub state: UpgradeState,
    #[serde(default, deserialize_with = "lenient::text")]
    pub target: String,
    #[serde(default, deserialize_with = "lenient::finite_number")]
    pub progress: Option<f64>,
    #[serde(default, rename = "msg", deserialize_with = "lenient::text")]
    pub message: String,
}

/// Progress shown to the user for a remote state and percentage.
///
/// `done` always shows a full bar, a queued job with no progress yet shows a
/// sliver, everything else is the remote value clamped to 0..=100.
pub fn display_progress(state: &UpgradeState, remote: f64) -> u8 {
    let progress = match state {
        UpgradeState::Done => 100.0,
        UpgradeState::Queued if remote <= 0.0 => 2.0,
        _ => remote,
    };
    if progress.is_nan() {
        return 0;
    }
    progress.clamp(0.0, 100.0).round() as u8
}

/// Firmware that can be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeTarget {
    Supervisor,
    Flowio,
    Nextion,
}

impl UpgradeTarget {
    pub fn endpoint(self) -> &'static str {
        match self {
            UpgradeTarget::Supervisor => endpoints::FWUPDATE_SUPERVISOR,
            UpgradeTarget::Flowio => endpoints::FWUPDATE_FLOWIO,
            UpgradeTarget::Nextion => endpoints::FWUPDATE_NEXTION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeTarget::Supervisor => "supervisor",
            UpgradeTarget::Flowio => "flowio",
            UpgradeTarget::Nextion => "nextion",
        }
    }
}

impl fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted update source (`/api/fwupdate/config`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradeSettings {
    #[serde(default, deserialize_with = "lenient::text")]
    pub update_host: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub flowio_path: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub supervisor_path: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nextion_path: String,
}

impl UpgradeSettings {
    /// Form body for saving; values are trimmed.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("update_host", self.update_host.trim().to_string()),
            ("flowio_path", self.flowio_path.trim().to_string()),
            ("supervisor_path", self.supervisor_path.trim().to_string()),
            ("nextion_path", self.nextion_path.trim().to_string()),
        ]
    }
}
