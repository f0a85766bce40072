//! `flowio upgrade` - firmware update

use std::time::Duration;

use crate::cli::output::{format_upgrade_settings, format_upgrade_view};
use crate::cli::{UpgradeConfigArgs, UpgradeStartArgs, UpgradeStatusArgs};
use crate::session::ConsoleSession;
use crate::upgrade::{UpgradeState, UpgradeView};

fn is_terminal(view: &UpgradeView) -> bool {
    matches!(view.state, Some(UpgradeState::Done | UpgradeState::Error))
}

/// Follow the fixed-interval poll until the update settles or Ctrl-C.
async fn watch(session: &ConsoleSession) -> Result<UpgradeView, Box<dyn std::error::Error>> {
    session.upgrade.start_polling();
    let mut last: Option<UpgradeView> = None;
    let mut sample = tokio::time::interval(Duration::from_millis(250));

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break last.unwrap_or_else(|| session.upgrade.view()),
            _ = sample.tick() => {}
        }

        let view = session.upgrade.view();
        if last.as_ref() != Some(&view) {
            println!("{}", format_upgrade_view(&view));
        }
        let done = is_terminal(&view);
        last = Some(view);
        if done {
            break session.upgrade.view();
        }
    };

    session.upgrade.stop_polling();
    Ok(result)
}

pub async fn handle_upgrade_status(
    session: &ConsoleSession,
    args: &UpgradeStatusArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let view = if args.watch {
        watch(session).await?
    } else {
        session.upgrade.refresh_status().await;
        session.upgrade.view()
    };

    if args.json {
        Ok(serde_json::to_string_pretty(&view)?)
    } else if args.watch {
        Ok(view.message)
    } else {
        Ok(format_upgrade_view(&view))
    }
}

pub async fn handle_upgrade_config(
    session: &ConsoleSession,
    args: &UpgradeConfigArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    session.upgrade.load_configuration().await?;
    if !args.has_changes() {
        return Ok(format_upgrade_settings(&session.upgrade.settings()));
    }

    let mut settings = session.upgrade.settings();
    if let Some(host) = &args.host {
        settings.update_host = host.clone();
    }
    if let Some(path) = &args.flowio_path {
        settings.flowio_path = path.clone();
    }
    if let Some(path) = &args.supervisor_path {
        settings.supervisor_path = path.clone();
    }
    if let Some(path) = &args.nextion_path {
        settings.nextion_path = path.clone();
    }
    session.upgrade.set_settings(settings);
    session.upgrade.save_configuration().await?;
    Ok(session.upgrade.view().message)
}

pub async fn handle_upgrade_start(
    session: &ConsoleSession,
    args: &UpgradeStartArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    // The stored source is saved again before starting; load it first so
    // the save does not blank it.
    session.upgrade.load_configuration().await?;
    session.upgrade.start_upgrade(args.target).await?;

    if args.watch {
        let view = watch(session).await?;
        return Ok(view.message);
    }
    Ok(session.upgrade.view().message)
}
