//! `flowio wifi` - scan and credentials

use std::time::Duration;

use crate::cli::output::{format_scan_view, format_wifi_settings};
use crate::cli::{WifiScanArgs, WifiSetArgs};
use crate::session::ConsoleSession;

/// Refresh the scan and wait while the device keeps re-arming the poll.
pub async fn handle_wifi_scan(
    session: &ConsoleSession,
    args: &WifiScanArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let wifi = &session.wifi;
    wifi.refresh_scan_status(args.force).await;

    while wifi.is_polling() {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                wifi.stop_polling();
                break;
            }
            _ = tokio::time::sleep(Duration::from_millis(200)) => {}
        }
    }

    let view = wifi.view();
    if view.last_scan.is_none() {
        return Err(view.status.into());
    }
    if args.json {
        Ok(serde_json::to_string_pretty(&view.scan)?)
    } else {
        Ok(format_scan_view(&view))
    }
}

pub async fn handle_wifi_show(
    session: &ConsoleSession,
) -> Result<String, Box<dyn std::error::Error>> {
    session.wifi.load_config().await?;
    let view = session.wifi.view();
    Ok(format!("{}\n{}", format_wifi_settings(&view.settings), view.status))
}

pub async fn handle_wifi_set(
    session: &ConsoleSession,
    args: &WifiSetArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    session.wifi.load_config().await?;
    let mut settings = session.wifi.view().settings;
    if let Some(ssid) = &args.ssid {
        settings.ssid = ssid.clone();
    }
    if let Some(pass) = &args.pass {
        settings.pass = pass.clone();
    }
    if args.enable {
        settings.enabled = true;
    }
    if args.disable {
        settings.enabled = false;
    }
    session.wifi.set_settings(settings);
    session.wifi.save_config().await?;
    Ok(session.wifi.view().status)
}
