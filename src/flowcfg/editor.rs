//! Typed form model for one configuration module.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::sync::{Arc, LazyLock, RwLock};

use super::path::normalize_path;
use crate::device::{endpoints, lenient, DeviceApi, DeviceError};

/// Value the device sends in place of a stored secret.
pub const MASKED_SENTINEL: &str = "***";

static SECRET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pass|token|secret").expect("valid secret pattern"));

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid float pattern")
});

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid integer pattern"));

/// Errors raised by the module editor.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no configuration module selected")]
    NoModuleSelected,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field '{0}' is not a toggle")]
    NotAToggle(String),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Input control kind, decided from the remote value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
    Secret,
}

impl FieldKind {
    /// Step of a numeric input.
    pub fn step(self) -> Option<&'static str> {
        match self {
            FieldKind::Int => Some("1"),
            FieldKind::Float => Some("0.001"),
            _ => None,
        }
    }
}

/// Whether a field name denotes a secret.
pub fn is_secret_name(name: &str) -> bool {
    SECRET_NAME.is_match(name)
}

/// One rendered field control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldControl {
    pub key: String,
    pub kind: FieldKind,
    /// Current input text (unused for toggles)
    pub text: String,
    /// Current toggle state (toggles only)
    pub checked: bool,
    /// A secret whose stored value is hidden; empty input keeps it
    pub masked: bool,
}

impl FieldControl {
    /// Classify a remote value into a control.
    pub fn classify(key: &str, value: &Value) -> Self {
        let mut control = Self {
            key: key.to_string(),
            kind: FieldKind::Text,
            text: String::new(),
            checked: false,
            masked: false,
        };

        match value {
            Value::Bool(b) => {
                control.kind = FieldKind::Bool;
                control.checked = *b;
            }
            Value::Number(n) => {
                control.kind = if is_integer_valued(n) {
                    FieldKind::Int
                } else {
                    FieldKind::Float
                };
                control.text = n.to_string();
            }
            other => {
                let text = match other {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    v => v.to_string(),
                };
                if is_secret_name(key) {
                    control.kind = FieldKind::Secret;
                    if text == MASKED_SENTINEL {
                        control.masked = true;
                    } else {
                        control.text = text;
                    }
                } else {
                    control.text = text;
                }
            }
        }
        control
    }

    /// Placeholder shown in an empty masked input.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.masked.then_some("Keep current (hidden)")
    }

    /// Patch value of this control, or `None` when it must be omitted.
    fn patch_value(&self) -> Option<Value> {
        match self.kind {
            FieldKind::Bool => Some(Value::Bool(self.checked)),
            FieldKind::Int => Some(Value::from(parse_leading_int(&self.text).unwrap_or(0))),
            FieldKind::Float => Some(float_value(parse_leading_float(&self.text).unwrap_or(0.0))),
            FieldKind::Secret if self.masked && self.text.is_empty() => None,
            FieldKind::Secret | FieldKind::Text => Some(Value::String(self.text.clone())),
        }
    }
}

fn is_integer_valued(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

/// Integer prefix of `text` (`"12abc"` → 12), after leading whitespace.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let m = LEADING_INT.find(text.trim_start())?;
    let digits = m.as_str();
    digits.parse::<i64>().ok().or_else(|| {
        // Out of range: saturate like the numeric input would.
        Some(if digits.starts_with('-') { i64::MIN } else { i64::MAX })
    })
}

/// Finite float prefix of `text` (`"1.5kg"` → 1.5), after leading whitespace.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let m = LEADING_FLOAT.find(text.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map_or(Value::from(0), Value::Number)
    }
}

/// A single-module partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub module: String,
    pub fields: Map<String, Value>,
}

impl Patch {
    /// `{ "<module>": { fields... } }`
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        root.insert(self.module.clone(), Value::Object(self.fields.clone()));
        Value::Object(root)
    }
}

#[derive(Debug, Deserialize)]
struct ModuleResponse {
    data: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::flag")]
    truncated: bool,
}

/// Snapshot of the editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EditorState {
    /// Loaded module path, `None` when nothing is selected
    pub module: Option<String>,
    pub baseline: Map<String, Value>,
    /// Controls in sorted key order
    pub fields: Vec<FieldControl>,
    pub apply_enabled: bool,
    pub truncated: bool,
    pub status: String,
}

impl EditorState {
    fn reset(&mut self, message: Option<String>) {
        self.module = None;
        self.baseline.clear();
        self.fields.clear();
        self.apply_enabled = false;
        self.truncated = false;
        if let Some(message) = message {
            self.status = message;
        }
    }
}

/// Form model of the selected configuration module.
pub struct ConfigModuleEditor {
    device: Arc<dyn DeviceApi>,
    state: RwLock<EditorState>,
}

impl ConfigModuleEditor {
    pub fn new(device: Arc<dyn DeviceApi>) -> Self {
        Self {
            device,
            state: RwLock::new(EditorState::default()),
        }
    }

    pub fn state(&self) -> EditorState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn current_module(&self) -> Option<String> {
        self.state().module
    }

    fn update<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> R {
        f(&mut self.state.write().unwrap_or_else(|e| e.into_inner()))
    }

    pub(crate) fn set_status(&self, status: impl Into<String>) {
        let status = status.into();
        self.update(|s| s.status = status);
    }

    /// Clear the editor, optionally replacing the status line.
    pub fn reset(&self, message: Option<&str>) {
        self.update(|s| s.reset(message.map(str::to_string)));
    }

    /// Fetch `module` and rebuild the form from its fields.
    ///
    /// Any failure clears the form and disables apply.
    pub async fn load(&self, module: &str) -> Result<(), DeviceError> {
        let module = normalize_path(module);
        if module.is_empty() {
            self.reset(Some("No section selected."));
            return Ok(());
        }

        let result = async {
            let body = self
                .device
                .get_json(endpoints::FLOWCFG_MODULE, &[("name", module.as_str())])
                .await?;
            serde_json::from_value::<ModuleResponse>(body)
                .map_err(|e| DeviceError::Malformed(format!("module '{}': {}", module, e)))
        }
        .await;

        match result {
            Ok(response) => {
                let mut keys: Vec<&String> = response.data.keys().collect();
                keys.sort();
                let fields: Vec<FieldControl> = keys
                    .into_iter()
                    .map(|k| FieldControl::classify(k, &response.data[k.as_str()]))
                    .collect();

                tracing::debug!(module = %module, fields = fields.len(), truncated = response.truncated, "Module loaded");
                self.update(|s| {
                    s.status = match (fields.is_empty(), response.truncated) {
                        (true, _) => "No configurable field in this branch.".to_string(),
                        (false, true) => {
                            "Branch loaded (truncated, device buffer limit reached).".to_string()
                        }
                        (false, false) => "Branch loaded.".to_string(),
                    };
                    s.module = Some(module);
                    s.baseline = response.data;
                    s.fields = fields;
                    s.apply_enabled = true;
                    s.truncated = response.truncated;
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(module = %module, error = %e, "Failed to load module");
                self.update(|s| s.reset(Some(format!("Branch load failed: {}", e))));
                Err(e)
            }
        }
    }

    /// Set the text of a non-toggle field.
    pub fn set_text(&self, key: &str, text: &str) -> Result<(), EditorError> {
        self.update(|s| {
            let field = s
                .fields
                .iter_mut()
                .find(|f| f.key == key)
                .ok_or_else(|| EditorError::UnknownField(key.to_string()))?;
            if field.kind == FieldKind::Bool {
                field.checked = lenient::to_bool(&Value::String(text.to_string()));
            } else {
                field.text = text.to_string();
            }
            Ok(())
        })
    }

    /// Set a toggle field.
    pub fn set_checked(&self, key: &str, checked: bool) -> Result<(), EditorError> {
        self.update(|s| {
            let field = s
                .fields
                .iter_mut()
                .find(|f| f.key == key)
                .ok_or_else(|| EditorError::UnknownField(key.to_string()))?;
            if field.kind != FieldKind::Bool {
                return Err(EditorError::NotAToggle(key.to_string()));
            }
            field.checked = checked;
            Ok(())
        })
    }

    /// Build the patch for the loaded module from the rendered controls.
    pub fn build_patch(&self) -> Result<Patch, EditorError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let module = state.module.clone().ok_or(EditorError::NoModuleSelected)?;

        let fields = state
            .fields
            .iter()
            .filter_map(|f| f.patch_value().map(|v| (f.key.clone(), v)))
            .collect();

        Ok(Patch { module, fields })
    }

    /// Submit the patch and reload the module on success.
    ///
    /// On failure the form is left as it was.
    pub async fn apply(&self) -> Result<(), EditorError> {
        let patch = match self.build_patch() {
            Ok(patch) => patch,
            Err(e) => {
                self.set_status(format!("Apply failed: {}", e));
                return Err(e);
            }
        };

        let form = [("patch", patch.to_json().to_string())];
        if let Err(e) = self.device.post_form(endpoints::FLOWCFG_APPLY, &form).await {
            tracing::warn!(module = %patch.module, error = %e, "Configuration patch rejected");
            self.set_status(format!("Apply failed: {}", e));
            return Err(e.into());
        }

        tracing::info!(module = %patch.module, fields = patch.fields.len(), "Configuration patch applied");
        // A failed reload keeps its own status line.
        self.load(&patch.module).await?;
        self.set_status("Configuration applied on Flow.IO.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::ScriptedDevice;
    use serde_json::json;

    const MODULE: &str = "GET /api/flowcfg/module?name=mqtt";
    const APPLY: &str = "POST /api/flowcfg/apply";

    fn loaded_editor(data: Value) -> (Arc<ScriptedDevice>, ConfigModuleEditor) {
        let device = Arc::new(ScriptedDevice::new());
        device.respond(MODULE, json!({"ok": true, "data": data}));
        let editor = ConfigModuleEditor::new(device.clone());
        (device, editor)
    }

    #[test]
    fn test_classification() {
        assert_eq!(FieldControl::classify("on", &json!(true)).kind, FieldKind::Bool);
        assert_eq!(FieldControl::classify("n", &json!(3)).kind, FieldKind::Int);
        assert_eq!(FieldControl::classify("n", &json!(3.0)).kind, FieldKind::Int);
        assert_eq!(FieldControl::classify("x", &json!(0.25)).kind, FieldKind::Float);
        assert_eq!(FieldControl::classify("host", &json!("a")).kind, FieldKind::Text);
        assert_eq!(FieldControl::classify("ApiToken", &json!("t")).kind, FieldKind::Secret);
        assert_eq!(FieldKind::Int.step(), Some("1"));
        assert_eq!(FieldKind::Float.step(), Some("0.001"));
    }

    #[test]
    fn test_masked_secret_rendered_empty() {
        let control = FieldControl::classify("password", &json!("***"));
        assert!(control.masked);
        assert_eq!(control.text, "");
        assert!(control.placeholder().is_some());

        let plain = FieldControl::classify("password", &json!("visible"));
        assert!(!plain.masked);
        assert_eq!(plain.text, "visible");
    }

    #[test]
    fn test_sentinel_in_non_secret_is_text() {
        let control = FieldControl::classify("label", &json!("***"));
        assert_eq!(control.kind, FieldKind::Text);
        assert_eq!(control.text, "***");
    }

    #[test]
    fn test_leading_number_parsers() {
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("  -4"), Some(-4));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("1.9"), Some(1));
        assert_eq!(parse_leading_float("1.5kg"), Some(1.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("2e3"), Some(2000.0));
        assert_eq!(parse_leading_float("x1"), None);
    }

    #[tokio::test]
    async fn test_build_patch_without_module_fails() {
        let editor = ConfigModuleEditor::new(Arc::new(ScriptedDevice::new()));
        assert!(matches!(
            editor.build_patch(),
            Err(EditorError::NoModuleSelected)
        ));
    }

    #[tokio::test]
    async fn test_load_sorts_fields_and_enables_apply() {
        let (_device, editor) = loaded_editor(json!({"port": 1883, "enabled": true, "host": "b"}));

        editor.load("/mqtt/").await.unwrap();

        let state = editor.state();
        let keys: Vec<&str> = state.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["enabled", "host", "port"]);
        assert_eq!(state.module.as_deref(), Some("mqtt"));
        assert!(state.apply_enabled);
        assert_eq!(state.status, "Branch loaded.");
    }

    #[tokio::test]
    async fn test_secret_round_trip() {
        let (_device, editor) = loaded_editor(json!({"password": "***", "host": "broker"}));
        editor.load("mqtt").await.unwrap();

        let patch = editor.build_patch().unwrap();
        assert!(!patch.fields.contains_key("password"));
        assert_eq!(patch.fields["host"], json!("broker"));

        editor.set_text("password", "n3w").unwrap();
        let patch = editor.build_patch().unwrap();
        assert_eq!(patch.fields["password"], json!("n3w"));
    }

    #[tokio::test]
    async fn test_corrupted_numbers_serialize_to_zero() {
        let (_device, editor) = loaded_editor(json!({"port": 1883, "ratio": 0.5}));
        editor.load("mqtt").await.unwrap();

        editor.set_text("port", "abc").unwrap();
        editor.set_text("ratio", "").unwrap();
        let patch = editor.build_patch().unwrap();

        assert_eq!(patch.fields["port"], json!(0));
        assert_eq!(patch.fields["ratio"], json!(0));
    }

    #[tokio::test]
    async fn test_set_checked_validation() {
        let (_device, editor) = loaded_editor(json!({"enabled": false, "host": "x"}));
        editor.load("mqtt").await.unwrap();

        editor.set_checked("enabled", true).unwrap();
        assert!(matches!(
            editor.set_checked("host", true),
            Err(EditorError::NotAToggle(_))
        ));
        assert!(matches!(
            editor.set_text("missing", "1"),
            Err(EditorError::UnknownField(_))
        ));
        assert_eq!(editor.build_patch().unwrap().fields["enabled"], json!(true));
    }

    #[tokio::test]
    async fn test_apply_posts_single_module_patch_and_reloads() {
        let (device, editor) = loaded_editor(json!({"port": 1883, "token": "***"}));
        device.respond(APPLY, json!({"ok": true}));
        editor.load("mqtt").await.unwrap();
        editor.set_text("port", "1884").unwrap();

        editor.apply().await.unwrap();

        let form = device.last_form(APPLY).unwrap();
        assert_eq!(form[0].0, "patch");
        let sent: Value = serde_json::from_str(&form[0].1).unwrap();
        assert_eq!(sent, json!({"mqtt": {"port": 1884}}));
        assert_eq!(device.count(MODULE), 2);
        // Reload reflects the device, not the local edit.
        assert_eq!(editor.state().fields[0].text, "1883");
        assert_eq!(editor.state().status, "Configuration applied on Flow.IO.");
    }

    #[tokio::test]
    async fn test_apply_then_failed_reload_reports_reload_error() {
        let (device, editor) = loaded_editor(json!({"port": 1883}));
        device.respond(APPLY, json!({"ok": true}));
        editor.load("mqtt").await.unwrap();
        device.fail(MODULE, DeviceError::Http(500));

        let result = editor.apply().await;

        assert!(matches!(result, Err(EditorError::Device(DeviceError::Http(500)))));
        assert_eq!(device.count(APPLY), 1);
        assert!(editor.state().status.starts_with("Branch load failed"));
    }

    #[tokio::test]
    async fn test_apply_failure_keeps_edits() {
        let (device, editor) = loaded_editor(json!({"port": 1883}));
        device.respond(APPLY, json!({"ok": false}));
        editor.load("mqtt").await.unwrap();
        editor.set_text("port", "42").unwrap();

        let result = editor.apply().await;

        assert!(matches!(result, Err(EditorError::Device(_))));
        let state = editor.state();
        assert_eq!(state.fields[0].text, "42");
        assert!(state.apply_enabled);
        assert!(state.status.starts_with("Apply failed"));
        assert_eq!(device.count(MODULE), 1);
    }

    #[tokio::test]
    async fn test_load_failure_discards_edits() {
        let (device, editor) = loaded_editor(json!({"port": 1883}));
        editor.load("mqtt").await.unwrap();
        editor.set_text("port", "42").unwrap();

        device.respond(MODULE, json!({"ok": true, "data": "not an object"}));
        assert!(editor.load("mqtt").await.is_err());

        let state = editor.state();
        assert!(state.fields.is_empty());
        assert!(!state.apply_enabled);
        assert_eq!(state.module, None);
        assert!(state.status.starts_with("Branch load failed"));
    }

    #[tokio::test]
    async fn test_truncated_and_empty_status() {
        let device = Arc::new(ScriptedDevice::new());
        device.respond(MODULE, json!({"ok": true, "data": {"a": 1}, "truncated": true}));
        let editor = ConfigModuleEditor::new(device.clone());
        editor.load("mqtt").await.unwrap();
        assert!(editor.state().truncated);
        assert!(editor.state().status.contains("truncated"));

        device.respond(MODULE, json!({"ok": true, "data": {}}));
        editor.load("mqtt").await.unwrap();
        assert_eq!(editor.state().status, "No configurable field in this branch.");
    }
}
