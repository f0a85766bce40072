//! CLI module for the Flow.IO console
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `logs` - Follow the serial log stream
//! - `status` - Show Flow.IO telemetry
//! - `upgrade` - Firmware update configuration, start and progress
//! - `wifi` - WiFi scan and credentials
//! - `mqtt` - MQTT broker settings
//! - `cfg` - Browse and edit the configuration tree
//! - `system` - Reboot / factory reset
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Follow logs from a device on the local network
//! flowio --url http://flowio.local logs
//!
//! # Change one field of a configuration module
//! flowio cfg set mqtt port=1884
//! ```

pub mod cfg;
pub mod completions;
pub mod config;
pub mod logs;
pub mod mqtt;
pub mod output;
pub mod status;
pub mod system;
pub mod upgrade;
pub mod wifi;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConsoleConfig;
use crate::system::SystemTarget;
use crate::upgrade::UpgradeTarget;

/// Flow.IO console - logs, firmware update and configuration of a Flow.IO controller
#[derive(Parser, Debug)]
#[command(name = "flowio", version, about = "Flow.IO device console")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Supervisor base URL (overrides config and FLOWIO_URL)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve configuration: file, then environment, then flags.
    pub fn load_config(&self) -> Result<ConsoleConfig, Box<dyn std::error::Error>> {
        let mut config = ConsoleConfig::load(self.config.as_deref())?.with_env_overrides();
        if let Some(url) = &self.url {
            config.device.base_url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow the serial log stream
    Logs(LogsArgs),
    /// Show Flow.IO telemetry
    Status(StatusArgs),
    /// Firmware update
    #[command(subcommand)]
    Upgrade(UpgradeCommands),
    /// WiFi scan and credentials
    #[command(subcommand)]
    Wifi(WifiCommands),
    /// MQTT broker settings
    #[command(subcommand)]
    Mqtt(MqttCommands),
    /// Browse and edit the configuration tree
    #[command(subcommand)]
    Cfg(CfgCommands),
    /// Reboot or factory reset a board
    #[command(subcommand)]
    System(SystemCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Print lines without color
    #[arg(long)]
    pub no_color: bool,

    /// Prefix each line with the local receive time
    #[arg(long)]
    pub timestamps: bool,

    /// Exit after this many lines
    #[arg(short = 'n', long)]
    pub lines: Option<usize>,

    /// Send a line to the device console after connecting
    #[arg(long)]
    pub send: Vec<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum UpgradeCommands {
    /// Show the update state
    Status(UpgradeStatusArgs),
    /// Show or change the update source
    Config(UpgradeConfigArgs),
    /// Save the update source and start an update
    Start(UpgradeStartArgs),
}

#[derive(Args, Debug)]
pub struct UpgradeStatusArgs {
    /// Keep polling until the update is done or failed
    #[arg(short, long)]
    pub watch: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpgradeConfigArgs {
    /// Firmware server host
    #[arg(long)]
    pub host: Option<String>,

    /// Flow.IO firmware path
    #[arg(long)]
    pub flowio_path: Option<String>,

    /// Supervisor firmware path
    #[arg(long)]
    pub supervisor_path: Option<String>,

    /// Nextion display firmware path
    #[arg(long)]
    pub nextion_path: Option<String>,
}

impl UpgradeConfigArgs {
    pub fn has_changes(&self) -> bool {
        self.host.is_some()
            || self.flowio_path.is_some()
            || self.supervisor_path.is_some()
            || self.nextion_path.is_some()
    }
}

#[derive(Args, Debug)]
pub struct UpgradeStartArgs {
    /// Firmware to update
    #[arg(value_enum)]
    pub target: UpgradeTarget,

    /// Follow progress after starting
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum WifiCommands {
    /// List visible networks
    Scan(WifiScanArgs),
    /// Show the stored credentials
    Show,
    /// Change the credentials
    Set(WifiSetArgs),
}

#[derive(Args, Debug)]
pub struct WifiScanArgs {
    /// Ask the device for a fresh scan instead of cached results
    #[arg(short, long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WifiSetArgs {
    /// Network name
    #[arg(long)]
    pub ssid: Option<String>,

    /// Network password
    #[arg(long)]
    pub pass: Option<String>,

    /// Enable the station interface
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable the station interface
    #[arg(long)]
    pub disable: bool,
}

#[derive(Subcommand, Debug)]
pub enum MqttCommands {
    /// Show the broker settings
    Show,
    /// Change the broker settings
    Set(MqttSetArgs),
}

#[derive(Args, Debug)]
pub struct MqttSetArgs {
    #[arg(long)]
    pub server: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CfgCommands {
    /// List the branches under a path
    Ls(CfgLsArgs),
    /// Show the fields of a module
    Show(CfgShowArgs),
    /// Change fields of a module
    Set(CfgSetArgs),
}

#[derive(Args, Debug)]
pub struct CfgLsArgs {
    /// Tree path (root when omitted)
    #[arg(default_value = "")]
    pub path: String,

    /// Drop cached listings and reload
    #[arg(short, long)]
    pub refresh: bool,
}

#[derive(Args, Debug)]
pub struct CfgShowArgs {
    /// Module path
    pub module: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CfgSetArgs {
    /// Module path
    pub module: String,

    /// Field assignments
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Reboot a board
    Reboot(SystemActionArgs),
    /// Erase the settings of a board and reboot it
    FactoryReset(SystemActionArgs),
}

#[derive(Args, Debug)]
pub struct SystemActionArgs {
    #[arg(value_enum)]
    pub target: SystemTarget,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "flowio.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
