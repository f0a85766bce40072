use clap::Parser;
use flowio::cli::{
    cfg, logs, mqtt, status, system, upgrade, wifi, handle_completions, handle_config_init,
    CfgCommands, Cli, Commands, ConfigCommands, MqttCommands, SystemCommands, UpgradeCommands,
    WifiCommands,
};
use flowio::session::ConsoleSession;
use flowio::system::SystemAction;

type CliResult = Result<Option<String>, Box<dyn std::error::Error>>;

async fn run(cli: Cli) -> CliResult {
    let config = cli.load_config()?;
    flowio::logging::init_tracing(&config.logging)?;

    if let Commands::Logs(args) = &cli.command {
        logs::run_logs(&config, args).await?;
        return Ok(None);
    }

    let session = ConsoleSession::connect(&config)?;
    let output = match &cli.command {
        Commands::Status(args) => status::handle_status(&session, args).await?,
        Commands::Upgrade(cmd) => match cmd {
            UpgradeCommands::Status(args) => upgrade::handle_upgrade_status(&session, args).await?,
            UpgradeCommands::Config(args) => upgrade::handle_upgrade_config(&session, args).await?,
            UpgradeCommands::Start(args) => upgrade::handle_upgrade_start(&session, args).await?,
        },
        Commands::Wifi(cmd) => match cmd {
            WifiCommands::Scan(args) => wifi::handle_wifi_scan(&session, args).await?,
            WifiCommands::Show => wifi::handle_wifi_show(&session).await?,
            WifiCommands::Set(args) => wifi::handle_wifi_set(&session, args).await?,
        },
        Commands::Mqtt(cmd) => match cmd {
            MqttCommands::Show => mqtt::handle_mqtt_show(&session).await?,
            MqttCommands::Set(args) => mqtt::handle_mqtt_set(&session, args).await?,
        },
        Commands::Cfg(cmd) => match cmd {
            CfgCommands::Ls(args) => cfg::handle_cfg_ls(&session, args).await?,
            CfgCommands::Show(args) => cfg::handle_cfg_show(&session, args).await?,
            CfgCommands::Set(args) => cfg::handle_cfg_set(&session, args).await?,
        },
        Commands::System(cmd) => match cmd {
            SystemCommands::Reboot(args) => {
                system::handle_system_action(&session, SystemAction::Reboot, args).await?
            }
            SystemCommands::FactoryReset(args) => {
                system::handle_system_action(&session, SystemAction::FactoryReset, args).await?
            }
        },
        Commands::Logs(_) | Commands::Config(_) | Commands::Completions(_) => unreachable!(),
    };
    session.shutdown();
    Ok(Some(output))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Commands that never touch the device
    let local: Option<CliResult> = match &cli.command {
        Commands::Config(ConfigCommands::Init(args)) => Some(handle_config_init(args).map(Some)),
        Commands::Completions(args) => {
            handle_completions(args);
            Some(Ok(None))
        }
        _ => None,
    };
    let result = match local {
        Some(result) => result,
        None => run(cli).await,
    };

    match result {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
