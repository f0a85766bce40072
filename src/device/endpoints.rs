//! Device HTTP endpoints.

pub const FWUPDATE_CONFIG: &str = "/api/fwupdate/config";
pub const FWUPDATE_STATUS: &str = "/api/fwupdate/status";
pub const FWUPDATE_SUPERVISOR: &str = "/fwupdate/supervisor";
pub const FWUPDATE_FLOWIO: &str = "/fwupdate/flowio";
pub const FWUPDATE_NEXTION: &str = "/fwupdate/nextion";

pub const MQTT_CONFIG: &str = "/api/mqtt/config";
pub const WIFI_CONFIG: &str = "/api/wifi/config";
pub const WIFI_SCAN: &str = "/api/wifi/scan";
pub const NETWORK_MODE: &str = "/api/network/mode";

pub const FLOW_STATUS: &str = "/api/flow/status";

pub const FLOWCFG_CHILDREN: &str = "/api/flowcfg/children";
pub const FLOWCFG_MODULE: &str = "/api/flowcfg/module";
pub const FLOWCFG_APPLY: &str = "/api/flowcfg/apply";

pub const SUPERVISOR_REBOOT: &str = "/api/system/reboot";
pub const SUPERVISOR_FACTORY_RESET: &str = "/api/system/factory-reset";
pub const FLOW_REBOOT: &str = "/api/flow/system/reboot";
pub const FLOW_FACTORY_RESET: &str = "/api/flow/system/factory-reset";
