//! WiFi scan and station credentials panel.
//!
//! Scan status is refreshed with a conditional-reschedule [`PollingMonitor`]:
//! the next poll is armed only while the device reports a scan running or
//! requested, and any failure stops the schedule until the user triggers a
//! new refresh.

mod types;

pub use types::{NetworkInfo, ScanEntry, ScanList, ScanStatus, WifiSettings, MAX_LABEL_LEN};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::device::{decode, endpoints, DeviceApi, DeviceError};
use crate::polling::{LoadLatch, MonitorState, PollDecision, PollPolicy, PollTarget, PollingMonitor};

/// What the WiFi panel currently shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WifiView {
    pub settings: WifiSettings,
    pub scan: ScanList,
    pub last_scan: Option<ScanStatus>,
    pub status: String,
}

/// Controller for the WiFi scan list and credentials.
pub struct WifiScanController {
    device: Arc<dyn DeviceApi>,
    view: RwLock<WifiView>,
    monitor: PollingMonitor,
    bootstrap: LoadLatch,
}

impl WifiScanController {
    pub fn new(device: Arc<dyn DeviceApi>, reschedule: Duration) -> Self {
        Self {
            device,
            view: RwLock::new(WifiView::default()),
            monitor: PollingMonitor::new("wifi_scan", PollPolicy::ConditionalReschedule(reschedule)),
            bootstrap: LoadLatch::new(),
        }
    }

    pub fn view(&self) -> WifiView {
        self.view.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut WifiView) -> R) -> R {
        f(&mut self.view.write().unwrap_or_else(|e| e.into_inner()))
    }

    fn set_status(&self, status: impl Into<String>) {
        let status = status.into();
        self.update(|view| view.status = status);
    }

    /// Edit the typed credentials.
    pub fn set_settings(&self, settings: WifiSettings) {
        self.update(|view| view.settings = settings);
    }

    /// Select a list entry; a non-empty SSID is copied into the typed field.
    ///
    /// Returns false when the SSID is not in the current list.
    pub fn pick_entry(&self, ssid: &str) -> bool {
        self.update(|view| {
            if ssid.is_empty() {
                view.scan.selected.clear();
                return true;
            }
            if !view.scan.contains(ssid) {
                return false;
            }
            view.scan.selected = ssid.to_string();
            view.settings.ssid = ssid.to_string();
            true
        })
    }

    /// Ask the device to scan. The device may answer from its cache when
    /// `force` is false.
    pub async fn request_scan(&self, force: bool) -> Result<(), DeviceError> {
        let form = [("force", if force { "1" } else { "0" }.to_string())];
        self.device.post_form(endpoints::WIFI_SCAN, &form).await?;
        tracing::debug!(force, "WiFi scan requested");
        Ok(())
    }

    /// Optionally trigger a scan, then fetch and render the scan status and
    /// re-arm or stop the monitor accordingly.
    pub async fn refresh_scan_status(self: &Arc<Self>, trigger_scan: bool) -> PollDecision {
        let decision = self.fetch_and_render(trigger_scan).await;
        self.monitor.apply(decision, self.clone());
        decision
    }

    /// Page-visible hook: force a scan the first time, refresh passively
    /// afterwards.
    pub async fn on_page_visible(self: &Arc<Self>) -> PollDecision {
        let trigger = self.bootstrap.try_claim();
        self.refresh_scan_status(trigger).await
    }

    async fn fetch_and_render(&self, trigger_scan: bool) -> PollDecision {
        let result = async {
            if trigger_scan {
                self.request_scan(true).await?;
            }
            let body = self.device.get_json(endpoints::WIFI_SCAN, &[]).await?;
            decode::<ScanStatus>(body)
        }
        .await;

        match result {
            Ok(status) => {
                let decision = if status.is_active() {
                    PollDecision::Continue
                } else {
                    PollDecision::Stop
                };
                self.update(|view| {
                    view.scan = ScanList::render(
                        &status.networks,
                        &view.settings.ssid,
                        &view.scan.selected,
                    );
                    view.status = status.summary();
                    view.last_scan = Some(status);
                });
                decision
            }
            Err(e) => {
                tracing::warn!(error = %e, "WiFi scan unavailable");
                self.set_status(format!("WiFi scan unavailable: {}", e));
                PollDecision::Stop
            }
        }
    }

    /// Cancel any pending scan poll.
    pub fn stop_polling(&self) {
        self.monitor.stop();
    }

    pub fn polling_state(&self) -> MonitorState {
        self.monitor.state()
    }

    /// A poll is armed or in flight.
    pub fn is_polling(&self) -> bool {
        self.monitor.state() != MonitorState::Idle
    }

    /// Load the stored credentials into the edit fields.
    pub async fn load_config(&self) -> Result<(), DeviceError> {
        let result = self
            .device
            .get_json(endpoints::WIFI_CONFIG, &[])
            .await
            .and_then(decode::<WifiSettings>);

        match result {
            Ok(settings) => {
                self.update(|view| {
                    view.settings = settings;
                    view.status = "WiFi configuration loaded.".to_string();
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load WiFi configuration");
                self.set_status(format!("WiFi load failed: {}", e));
                Err(e)
            }
        }
    }

    /// Save the edited credentials. The device reconnects afterwards.
    pub async fn save_config(&self) -> Result<(), DeviceError> {
        let form = self.view().settings.to_form();
        match self.device.post_form(endpoints::WIFI_CONFIG, &form).await {
            Ok(_) => {
                tracing::info!("WiFi configuration applied");
                self.set_status("WiFi configuration applied (reconnecting).");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to apply WiFi configuration");
                self.set_status(format!("WiFi apply failed: {}", e));
                Err(e)
            }
        }
    }
}

#[async_trait]
impl PollTarget for WifiScanController {
    async fn poll(&self) -> PollDecision {
        self.fetch_and_render(false).await
    }
}
