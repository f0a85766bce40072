//! MQTT broker configuration panel.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};

use crate::device::{decode, endpoints, lenient, DeviceApi, DeviceError};

/// Port used when the device reports none.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Broker settings (`/api/mqtt/config`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttSettings {
    #[serde(default, deserialize_with = "lenient::text")]
    pub server: String,
    #[serde(default = "default_port", deserialize_with = "port")]
    pub port: u16,
    #[serde(default, deserialize_with = "lenient::text")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub password: String,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: DEFAULT_MQTT_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_MQTT_PORT
}

fn port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|p| p.is_finite() && *p >= 0.0 && *p <= f64::from(u16::MAX))
        .map_or(DEFAULT_MQTT_PORT, |p| p as u16))
}

impl MqttSettings {
    /// Form body for saving; the password is sent as typed.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("server", self.server.trim().to_string()),
            ("port", self.port.to_string()),
            ("username", self.username.trim().to_string()),
            ("password", self.password.clone()),
        ]
    }
}

/// Controller for the MQTT panel.
pub struct MqttPanel {
    device: Arc<dyn DeviceApi>,
    settings: RwLock<MqttSettings>,
    status: RwLock<String>,
}

impl MqttPanel {
    pub fn new(device: Arc<dyn DeviceApi>) -> Self {
        Self {
            device,
            settings: RwLock::new(MqttSettings::default()),
            status: RwLock::new(String::new()),
        }
    }

    pub fn settings(&self) -> MqttSettings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_settings(&self, settings: MqttSettings) {
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }

    pub fn status(&self) -> String {
        self.status.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_status(&self, status: impl Into<String>) {
        *self.status.write().unwrap_or_else(|e| e.into_inner()) = status.into();
    }

    /// Load the stored settings; on failure the fields are kept.
    pub async fn load(&self) -> Result<(), DeviceError> {
        let result = self
            .device
            .get_json(endpoints::MQTT_CONFIG, &[])
            .await
            .and_then(decode::<MqttSettings>);

        match result {
            Ok(settings) => {
                self.set_settings(settings);
                self.set_status("MQTT configuration loaded.");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load MQTT configuration");
                self.set_status(format!("MQTT load failed: {}", e));
                Err(e)
            }
        }
    }

    pub async fn save(&self) -> Result<(), DeviceError> {
        let form = self.settings().to_form();
        match self.device.post_form(endpoints::MQTT_CONFIG, &form).await {
            Ok(_) => {
                tracing::info!("MQTT configuration applied");
                self.set_status("MQTT configuration applied.");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to apply MQTT configuration");
                self.set_status(format!("MQTT apply failed: {}", e));
                Err(e)
            }
        }
    }
}
