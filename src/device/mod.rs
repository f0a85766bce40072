//! HTTP access to the Flow.IO supervisor.
//!
//! Every JSON endpoint answers with an `{"ok": bool, ...}` envelope. The
//! [`DeviceApi`] trait hides the transport and returns the body only when
//! both the HTTP status and the envelope report success, so controllers deal
//! with a single error type.

pub mod endpoints;
mod error;
pub mod lenient;

#[cfg(test)]
pub(crate) mod testing;

pub use error::DeviceError;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::DeviceConfig;

/// Transport seam between controllers and the device.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// GET a JSON endpoint and return its body once the envelope is `ok`.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, DeviceError>;

    /// POST an url-encoded form and return the body once the envelope is `ok`.
    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<Value, DeviceError>;
}

/// Check the `ok` envelope of a device response.
pub fn ensure_ok(path: &str, body: Value) -> Result<Value, DeviceError> {
    match body.get("ok") {
        Some(Value::Bool(true)) => Ok(body),
        Some(_) => Err(DeviceError::Rejected(path.to_string())),
        None => Err(DeviceError::Rejected(format!("{path}: missing ok flag"))),
    }
}

/// Deserialize an envelope body into a typed response.
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, DeviceError> {
    serde_json::from_value(body).map_err(|e| DeviceError::Malformed(e.to_string()))
}

/// [`DeviceApi`] over HTTP with connection pooling.
#[derive(Debug, Clone)]
pub struct HttpDevice {
    base_url: String,
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpDevice {
    /// Create a device client from configuration.
    pub fn new(config: &DeviceConfig) -> Result<Self, DeviceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DeviceError::Connection(e.to_string()))?;

        Ok(Self::with_client(&config.base_url, client, config.timeout_seconds))
    }

    /// Create a device client with a custom HTTP client (for testing).
    pub fn with_client(base_url: &str, client: reqwest::Client, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Classify reqwest error into DeviceError.
    fn classify_error(e: reqwest::Error, timeout_seconds: u64) -> DeviceError {
        if e.is_timeout() {
            DeviceError::Timeout(timeout_seconds)
        } else if e.is_decode() {
            DeviceError::Malformed(e.to_string())
        } else {
            DeviceError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl DeviceApi for HttpDevice {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, DeviceError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| Self::classify_error(e, self.timeout_seconds))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Device GET failed");
            return Err(DeviceError::Http(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Self::classify_error(e, self.timeout_seconds))?;
        ensure_ok(path, body)
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<Value, DeviceError> {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|e| Self::classify_error(e, self.timeout_seconds))?;

        let status = response.status();
        // A POST body that is not JSON counts as an empty object, which the
        // envelope check then rejects.
        let body = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::Object(Default::default()));

        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Device POST failed");
            return Err(DeviceError::Http(status.as_u16()));
        }
        ensure_ok(path, body)
    }
}
