//! Scripted in-memory device for controller unit tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ensure_ok, DeviceApi, DeviceError};

/// A recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub key: String,
    pub form: Vec<(String, String)>,
}

/// Answers requests from a table keyed by `"GET /path?k=v"` / `"POST /path"`.
///
/// Responses are sticky: the same key keeps answering until replaced.
/// Unknown keys answer `Http(404)`.
#[derive(Default)]
pub struct ScriptedDevice {
    responses: Mutex<HashMap<String, Result<Value, DeviceError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, key: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), Ok(body));
    }

    pub fn fail(&self, key: &str, error: DeviceError) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.key == key)
            .count()
    }

    pub fn last_form(&self, key: &str) -> Option<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.key == key)
            .map(|c| c.form.clone())
    }

    fn answer(&self, key: String, path: &str, form: Vec<(String, String)>) -> Result<Value, DeviceError> {
        self.calls.lock().unwrap().push(Call {
            key: key.clone(),
            form,
        });
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(Err(DeviceError::Http(404)));
        ensure_ok(path, response?)
    }
}

#[async_trait]
impl DeviceApi for ScriptedDevice {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, DeviceError> {
        let mut key = format!("GET {path}");
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            key.push('?');
            key.push_str(&pairs.join("&"));
        }
        self.answer(key, path, Vec::new())
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<Value, DeviceError> {
        let form = form
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.answer(format!("POST {path}"), path, form)
    }
}
