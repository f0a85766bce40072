//! Firmware-update panel.
//!
//! Mirrors the remote update state machine (`idle → queued → running →
//! done | error`). The client never computes transitions: every status fetch
//! replaces the view. A fixed-interval [`PollingMonitor`] keeps the view
//! fresh; manual refreshes run alongside it and the last response to arrive
//! wins.

mod types;

pub use types::{display_progress, UpgradeSettings, UpgradeState, UpgradeStatus, UpgradeTarget};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::device::{decode, endpoints, DeviceApi, DeviceError};
use crate::polling::{MonitorState, PollDecision, PollPolicy, PollTarget, PollingMonitor};

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeView {
    pub state: Option<UpgradeState>,
    pub target: String,
    /// Display progress in percent
    pub progress: u8,
    pub message: String,
}

impl Default for UpgradeView {
    fn default() -> Self {
        Self {
            state: None,
            target: "-".to_string(),
            progress: 0,
            message: String::new(),
        }
    }
}

impl UpgradeView {
    fn from_status(status: &UpgradeStatus) -> Self {
        let label = status.state.label();
        let target = if status.target.is_empty() {
            "-".to_string()
        } else {
            status.target.clone()
        };
        let mut message = format!("{} | target={}", label, target);
        if !status.message.is_empty() {
            message.push_str(" | ");
            message.push_str(&status.message);
        }

        Self {
            state: Some(status.state.clone()),
            target,
            progress: display_progress(&status.state, status.progress.unwrap_or(0.0)),
            message,
        }
    }

    /// Short state label for the status chip.
    pub fn chip(&self) -> &str {
        self.state.as_ref().map_or("unknown", UpgradeState::label)
    }
}

/// Controller for firmware-update configuration, start and progress.
pub struct UpgradeStatusController {
    device: Arc<dyn DeviceApi>,
    settings: RwLock<UpgradeSettings>,
    view: RwLock<UpgradeView>,
    monitor: PollingMonitor,
}

impl UpgradeStatusController {
    pub fn new(device: Arc<dyn DeviceApi>, interval: Duration) -> Self {
        Self {
            device,
            settings: RwLock::new(UpgradeSettings::default()),
            view: RwLock::new(UpgradeView::default()),
            monitor: PollingMonitor::new("upgrade_status", PollPolicy::FixedInterval(interval)),
        }
    }

    pub fn view(&self) -> UpgradeView {
        self.view.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn settings(&self) -> UpgradeSettings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the edited configuration fields.
    pub fn set_settings(&self, settings: UpgradeSettings) {
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }

    fn set_message(&self, message: impl Into<String>) {
        self.view.write().unwrap_or_else(|e| e.into_inner()).message = message.into();
    }

    fn set_progress(&self, progress: u8) {
        self.view.write().unwrap_or_else(|e| e.into_inner()).progress = progress.min(100);
    }

    /// Fetch the persisted update host and paths into the edit fields.
    ///
    /// On failure the fields are left untouched and the message says why.
    pub async fn load_configuration(&self) -> Result<(), DeviceError> {
        let result = self
            .device
            .get_json(endpoints::FWUPDATE_CONFIG, &[])
            .await
            .and_then(decode::<UpgradeSettings>);

        match result {
            Ok(settings) => {
                self.set_settings(settings);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load update configuration");
                self.set_message(format!("Failed to load configuration: {}", e));
                Err(e)
            }
        }
    }

    /// Persist the edited fields. Fails unless the device acknowledges.
    pub async fn save_configuration(&self) -> Result<(), DeviceError> {
        let form = self.settings().to_form();
        self.device
            .post_form(endpoints::FWUPDATE_CONFIG, &form)
            .await?;
        self.set_message("Configuration saved.");
        Ok(())
    }

    /// Save the configuration, then ask the device to update `target`.
    ///
    /// The start request is only sent once the save succeeded. On success the
    /// bar moves optimistically and the status is refreshed right away.
    pub async fn start_upgrade(&self, target: UpgradeTarget) -> Result<(), DeviceError> {
        let result = async {
            self.save_configuration().await?;
            self.device.post_form(target.endpoint(), &[]).await
        }
        .await;

        match result {
            Ok(_) => {
                tracing::info!(target = %target, "Firmware update requested");
                self.set_progress(1);
                self.set_message(format!("Update request accepted for {}.", target));
                self.refresh_status().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target = %target, error = %e, "Firmware update request failed");
                self.set_message(format!("Update failed: {}", e));
                Err(e)
            }
        }
    }

    /// Fetch and apply the current update status.
    ///
    /// A response with `ok != true` is ignored; transport and decode failures
    /// only update the message.
    pub async fn refresh_status(&self) {
        let result = self
            .device
            .get_json(endpoints::FWUPDATE_STATUS, &[])
            .await
            .and_then(decode::<UpgradeStatus>);

        match result {
            Ok(status) => {
                *self.view.write().unwrap_or_else(|e| e.into_inner()) =
                    UpgradeView::from_status(&status);
            }
            Err(DeviceError::Rejected(_)) => {
                tracing::debug!("Update status not available");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read update status");
                self.set_message(format!("Failed to read status: {}", e));
            }
        }
    }

    /// Begin the fixed-interval status poll (first fetch is immediate).
    pub fn start_polling(self: &Arc<Self>) {
        self.monitor.start(self.clone());
    }

    pub fn stop_polling(&self) {
        self.monitor.stop();
    }

    pub fn polling_state(&self) -> MonitorState {
        self.monitor.state()
    }
}

#[async_trait]
impl PollTarget for UpgradeStatusController {
    async fn poll(&self) -> PollDecision {
        self.refresh_status().await;
        PollDecision::Continue
    }
}
