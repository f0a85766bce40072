//! `flowio logs` - follow the serial log stream

use crate::cli::output::format_log_line;
use crate::cli::LogsArgs;
use crate::config::ConsoleConfig;
use crate::logstream::{stream_url, ConnectionState, LogStreamClient, LogStreamView};

/// Stream log lines to stdout until Ctrl-C, the line limit, or the device
/// closes the stream.
pub async fn run_logs(
    config: &ConsoleConfig,
    args: &LogsArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = stream_url(&config.device.base_url, &config.device.log_stream_path)?;
    let mut client = LogStreamClient::connect(&url).await?;

    for line in &args.send {
        client.send_line(line).await?;
    }

    let mut view = LogStreamView::new(config.log_view.capacity);
    view.set_autoscroll(config.log_view.autoscroll);
    let mut received = 0usize;

    loop {
        if args.lines.is_some_and(|max| received >= max) {
            break;
        }

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = client.next_line() => line,
        };
        let Some(line) = line else {
            break;
        };

        received += 1;
        let timestamp = args
            .timestamps
            .then(|| chrono::Local::now().format("%H:%M:%S%.3f").to_string());
        println!(
            "{}",
            format_log_line(&line, args.no_color, timestamp.as_deref())
        );
        view.append(line);
    }

    let state = client.state();
    tracing::debug!(lines = received, retained = view.len(), state = state.label(), "Log stream ended");
    if state == ConnectionState::Connected {
        client.close().await;
    } else if state == ConnectionState::Error {
        return Err("log stream failed".into());
    }
    Ok(())
}
