//! `flowio mqtt` - broker settings

use crate::cli::output::format_mqtt_settings;
use crate::cli::MqttSetArgs;
use crate::session::ConsoleSession;

pub async fn handle_mqtt_show(
    session: &ConsoleSession,
) -> Result<String, Box<dyn std::error::Error>> {
    session.mqtt.load().await?;
    Ok(format!(
        "{}\n{}",
        format_mqtt_settings(&session.mqtt.settings()),
        session.mqtt.status()
    ))
}

pub async fn handle_mqtt_set(
    session: &ConsoleSession,
    args: &MqttSetArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    session.mqtt.load().await?;
    let mut settings = session.mqtt.settings();
    if let Some(server) = &args.server {
        settings.server = server.clone();
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(username) = &args.username {
        settings.username = username.clone();
    }
    if let Some(password) = &args.password {
        settings.password = password.clone();
    }
    session.mqtt.set_settings(settings);
    session.mqtt.save().await?;
    Ok(session.mqtt.status())
}
