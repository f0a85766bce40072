//! `flowio status` - Flow.IO telemetry

use crate::cli::output::format_status_report;
use crate::cli::StatusArgs;
use crate::session::ConsoleSession;

pub async fn handle_status(
    session: &ConsoleSession,
    args: &StatusArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let report = session.status.refresh().await?;
    if args.json {
        Ok(serde_json::to_string_pretty(&report.raw)?)
    } else {
        Ok(format_status_report(&report))
    }
}
