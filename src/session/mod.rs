//! Console session: one set of controllers bound to one device.
//!
//! The session owns every panel controller and the "load once" latches of
//! the page sections. Page hooks never fail: errors are reported in the
//! affected panel's status and emitted as tracing events.

use serde::Deserialize;
use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::device::{decode, endpoints, lenient, DeviceApi, DeviceError, HttpDevice};
use crate::flowcfg::ConfigNavigator;
use crate::mqtt::MqttPanel;
use crate::polling::LoadLatch;
use crate::status::FlowStatusPanel;
use crate::upgrade::UpgradeStatusController;
use crate::wifi::WifiScanController;

/// Console pages with page-visible hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Serial log (default landing page)
    Logs,
    /// Network configuration (WiFi, MQTT)
    Config,
    /// Configuration tree editor
    Control,
    /// Firmware update and system actions
    System,
}

#[derive(Debug, Deserialize)]
struct NetworkMode {
    #[serde(default, deserialize_with = "lenient::text")]
    mode: String,
}

pub struct ConsoleSession {
    device: Arc<dyn DeviceApi>,
    pub upgrade: Arc<UpgradeStatusController>,
    pub wifi: Arc<WifiScanController>,
    pub mqtt: MqttPanel,
    pub flowcfg: ConfigNavigator,
    pub status: FlowStatusPanel,
    wifi_config_loaded: LoadLatch,
    mqtt_config_loaded: LoadLatch,
    flowcfg_loaded: LoadLatch,
}

impl ConsoleSession {
    /// Session over HTTP using the device settings of `config`.
    pub fn connect(config: &ConsoleConfig) -> Result<Self, DeviceError> {
        let device = HttpDevice::new(&config.device)?;
        Ok(Self::with_device(Arc::new(device), config))
    }

    /// Session over any transport.
    pub fn with_device(device: Arc<dyn DeviceApi>, config: &ConsoleConfig) -> Self {
        Self {
            upgrade: Arc::new(UpgradeStatusController::new(
                device.clone(),
                config.polling.upgrade_interval(),
            )),
            wifi: Arc::new(WifiScanController::new(
                device.clone(),
                config.polling.scan_reschedule(),
            )),
            mqtt: MqttPanel::new(device.clone()),
            flowcfg: ConfigNavigator::new(device.clone()),
            status: FlowStatusPanel::new(device.clone()),
            device,
            wifi_config_loaded: LoadLatch::new(),
            mqtt_config_loaded: LoadLatch::new(),
            flowcfg_loaded: LoadLatch::new(),
        }
    }

    pub fn device(&self) -> &Arc<dyn DeviceApi> {
        &self.device
    }

    /// Session start: load the update source, read the telemetry once and
    /// begin the fixed-interval update poll.
    pub async fn start(&self) {
        // Failures are kept in the panels.
        let _ = futures::join!(self.upgrade.load_configuration(), self.status.refresh());
        self.upgrade.start_polling();
    }

    /// Stop every scheduled poll.
    pub fn shutdown(&self) {
        self.upgrade.stop_polling();
        self.wifi.stop_polling();
    }

    /// Landing page: the network configuration page when the device runs
    /// its own access point, the log page otherwise.
    pub async fn initial_page(&self) -> Page {
        let result = self
            .device
            .get_json(endpoints::NETWORK_MODE, &[])
            .await
            .and_then(decode::<NetworkMode>);

        match result {
            Ok(mode) if mode.mode == "ap" => Page::Config,
            Ok(_) => Page::Logs,
            Err(e) => {
                tracing::debug!(error = %e, "Network mode unavailable, keeping default page");
                Page::Logs
            }
        }
    }

    /// Dispatch a page-visible event.
    pub async fn on_page_shown(&self, page: Page) {
        match page {
            Page::Config => self.on_config_page_shown().await,
            Page::Control => self.on_control_page_shown().await,
            Page::Logs | Page::System => {}
        }
    }

    /// Load the WiFi and MQTT panels once, then bootstrap the scan.
    pub async fn on_config_page_shown(&self) {
        // Load failures are reported in the panel status.
        if self.wifi_config_loaded.try_claim() {
            let _ = self.wifi.load_config().await;
        }
        if self.mqtt_config_loaded.try_claim() {
            let _ = self.mqtt.load().await;
        }
        self.wifi.on_page_visible().await;
    }

    /// Load the configuration tree. The first visit refetches from the
    /// device; later visits are served from the branch cache.
    pub async fn on_control_page_shown(&self) {
        let initial = self.flowcfg_loaded.try_claim();
        if let Err(e) = self.flowcfg.load_modules(initial).await {
            tracing::warn!(error = %e, initial, "Configuration page load failed");
            if initial {
                // Retry the fresh load on the next visit.
                self.flowcfg_loaded.reset();
            }
        }
    }

    /// Whether the initial configuration tree load has succeeded.
    pub fn flowcfg_loaded(&self) -> bool {
        self.flowcfg_loaded.is_loaded()
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
