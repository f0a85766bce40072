//! Output formatting helpers for CLI commands

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::ansi::LineRecord;
use crate::flowcfg::{ConfigTreeNode, EditorState, FieldKind};
use crate::mqtt::MqttSettings;
use crate::status::FlowStatusReport;
use crate::upgrade::{UpgradeSettings, UpgradeState, UpgradeView};
use crate::wifi::{WifiSettings, WifiView};

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a log line, colored by its foreground unless `plain`.
pub fn format_log_line(line: &LineRecord, plain: bool, timestamp: Option<&str>) -> String {
    let text = match (plain, line.color) {
        (false, Some(color)) => line.text.color(color.terminal_color()).to_string(),
        _ => line.text.clone(),
    };
    match timestamp {
        Some(ts) => format!("{} {}", ts.dimmed(), text),
        None => text,
    }
}

fn colored_state(state: Option<&UpgradeState>) -> String {
    let label = state.map_or("unknown", UpgradeState::label);
    match state {
        Some(UpgradeState::Done) => label.green().to_string(),
        Some(UpgradeState::Error) => label.red().to_string(),
        Some(UpgradeState::Running) | Some(UpgradeState::Queued) => label.yellow().to_string(),
        _ => label.to_string(),
    }
}

/// `[#####.....] 50%` style progress bar.
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = usize::from(progress.min(100)) * width / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        progress
    )
}

pub fn format_upgrade_view(view: &UpgradeView) -> String {
    let mut table = table();
    table.set_header(vec!["State", "Target", "Progress", "Message"]);
    table.add_row(vec![
        Cell::new(colored_state(view.state.as_ref())),
        Cell::new(&view.target),
        Cell::new(progress_bar(view.progress, 20)),
        Cell::new(&view.message),
    ]);
    table.to_string()
}

pub fn format_upgrade_settings(settings: &UpgradeSettings) -> String {
    let mut table = table();
    table.set_header(vec!["Setting", "Value"]);
    for (key, value) in [
        ("update_host", &settings.update_host),
        ("flowio_path", &settings.flowio_path),
        ("supervisor_path", &settings.supervisor_path),
        ("nextion_path", &settings.nextion_path),
    ] {
        table.add_row(vec![key, value.as_str()]);
    }
    table.to_string()
}

pub fn format_status_report(report: &FlowStatusReport) -> String {
    let chip = if report.link_ok {
        report.chip.green().to_string()
    } else {
        report.chip.yellow().to_string()
    };

    let mut out = format!("{}\n", chip);
    for card in &report.cards {
        let mut table = table();
        table.set_header(vec![card.title, ""]);
        for (key, value) in &card.rows {
            table.add_row(vec![Cell::new(key), Cell::new(value)]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out
}

pub fn format_scan_view(view: &WifiView) -> String {
    let mut table = table();
    table.set_header(vec!["", "Network"]);
    for entry in &view.scan.entries {
        let marker = if entry.ssid == view.scan.selected { "*" } else { "" };
        table.add_row(vec![marker, entry.label.as_str()]);
    }
    format!("{}\n{}", table, view.status)
}

pub fn format_wifi_settings(settings: &WifiSettings) -> String {
    let mut table = table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["enabled".to_string(), settings.enabled.to_string()]);
    table.add_row(vec!["ssid".to_string(), settings.ssid.clone()]);
    table.add_row(vec!["pass".to_string(), mask(&settings.pass)]);
    table.to_string()
}

pub fn format_mqtt_settings(settings: &MqttSettings) -> String {
    let mut table = table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["server".to_string(), settings.server.clone()]);
    table.add_row(vec!["port".to_string(), settings.port.to_string()]);
    table.add_row(vec!["username".to_string(), settings.username.clone()]);
    table.add_row(vec!["password".to_string(), mask(&settings.password)]);
    table.to_string()
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "-".to_string()
    } else {
        "********".to_string()
    }
}

pub fn format_tree_node(title: &str, node: &ConfigTreeNode) -> String {
    let mut out = format!("{}\n", title.bold());
    if node.children.is_empty() {
        out.push_str("  (no sub-branch)\n");
    }
    for child in &node.children {
        out.push_str(&format!("  {}/\n", child));
    }
    if node.has_exact_module {
        out.push_str(&format!("  {}\n", "(module)".cyan()));
    }
    out
}

pub fn format_module_fields(state: &EditorState) -> String {
    let mut table = table();
    table.set_header(vec!["Field", "Type", "Value"]);
    for field in &state.fields {
        let value = match field.kind {
            FieldKind::Bool => field.checked.to_string(),
            FieldKind::Secret if field.masked => "(hidden)".dimmed().to_string(),
            FieldKind::Secret => mask(&field.text),
            _ => field.text.clone(),
        };
        let kind = match field.kind {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
            FieldKind::Secret => "secret",
        };
        table.add_row(vec![Cell::new(&field.key), Cell::new(kind), Cell::new(value)]);
    }
    format!("{}\n{}", table, state.status)
}
