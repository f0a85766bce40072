//! Reboot and factory-reset actions.

use std::fmt;

use crate::device::{endpoints, DeviceApi, DeviceError};

/// Board an action is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SystemTarget {
    /// The supervisor (web server host)
    Supervisor,
    /// The Flow.IO controller
    Flow,
}

impl fmt::Display for SystemTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SystemTarget::Supervisor => "supervisor",
            SystemTarget::Flow => "flow",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    Reboot,
    FactoryReset,
}

impl SystemAction {
    pub fn endpoint(self, target: SystemTarget) -> &'static str {
        match (target, self) {
            (SystemTarget::Supervisor, SystemAction::Reboot) => endpoints::SUPERVISOR_REBOOT,
            (SystemTarget::Supervisor, SystemAction::FactoryReset) => {
                endpoints::SUPERVISOR_FACTORY_RESET
            }
            (SystemTarget::Flow, SystemAction::Reboot) => endpoints::FLOW_REBOOT,
            (SystemTarget::Flow, SystemAction::FactoryReset) => endpoints::FLOW_FACTORY_RESET,
        }
    }

    /// Question asked before running the action.
    pub fn confirmation(self, target: SystemTarget) -> &'static str {
        match (target, self) {
            (SystemTarget::Supervisor, SystemAction::Reboot) => "Reboot the supervisor?",
            (SystemTarget::Supervisor, SystemAction::FactoryReset) => {
                "Factory reset the supervisor? All supervisor settings will be erased."
            }
            (SystemTarget::Flow, SystemAction::Reboot) => "Reboot Flow.IO?",
            (SystemTarget::Flow, SystemAction::FactoryReset) => {
                "Factory reset Flow.IO? All Flow.IO settings will be erased."
            }
        }
    }

    /// Message shown once the device accepted the action.
    pub fn accepted_message(self, target: SystemTarget) -> &'static str {
        match (target, self) {
            (SystemTarget::Supervisor, SystemAction::Reboot) => "Supervisor reboot started...",
            (SystemTarget::Supervisor, SystemAction::FactoryReset) => {
                "Supervisor factory reset started. Rebooting..."
            }
            (SystemTarget::Flow, SystemAction::Reboot) => "Flow.IO reboot started...",
            (SystemTarget::Flow, SystemAction::FactoryReset) => {
                "Flow.IO factory reset started. Rebooting..."
            }
        }
    }
}

/// Send `action` to `target` and return the message to show.
pub async fn run_action(
    device: &dyn DeviceApi,
    target: SystemTarget,
    action: SystemAction,
) -> Result<&'static str, DeviceError> {
    let endpoint = action.endpoint(target);
    match device.post_form(endpoint, &[]).await {
        Ok(_) => {
            tracing::info!(%target, ?action, "System action accepted");
            Ok(action.accepted_message(target))
        }
        Err(e) => {
            tracing::warn!(%target, ?action, error = %e, "System action failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::ScriptedDevice;
    use serde_json::json;

    #[test]
    fn test_endpoint_routing() {
        assert_eq!(
            SystemAction::Reboot.endpoint(SystemTarget::Supervisor),
            "/api/system/reboot"
        );
        assert_eq!(
            SystemAction::FactoryReset.endpoint(SystemTarget::Supervisor),
            "/api/system/factory-reset"
        );
        assert_eq!(
            SystemAction::Reboot.endpoint(SystemTarget::Flow),
            "/api/flow/system/reboot"
        );
        assert_eq!(
            SystemAction::FactoryReset.endpoint(SystemTarget::Flow),
            "/api/flow/system/factory-reset"
        );
    }

    #[tokio::test]
    async fn test_run_action_requires_ack() {
        let device = ScriptedDevice::new();
        device.respond("POST /api/flow/system/reboot", json!({"ok": true}));
        device.respond("POST /api/system/reboot", json!({}));

        let msg = run_action(&device, SystemTarget::Flow, SystemAction::Reboot)
            .await
            .unwrap();
        assert_eq!(msg, "Flow.IO reboot started...");

        assert!(
            run_action(&device, SystemTarget::Supervisor, SystemAction::Reboot)
                .await
                .is_err()
        );
    }
}
