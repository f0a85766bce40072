//! `flowio cfg` - configuration tree

use crate::cli::output::{format_module_fields, format_tree_node};
use crate::cli::{CfgLsArgs, CfgSetArgs, CfgShowArgs};
use crate::flowcfg::{normalize_path, FieldKind};
use crate::session::ConsoleSession;

/// Split `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(format!("Invalid assignment '{}', expected KEY=VALUE", raw)),
    }
}

pub async fn handle_cfg_ls(
    session: &ConsoleSession,
    args: &CfgLsArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let nav = &session.flowcfg;
    if args.refresh {
        nav.cache().invalidate_all();
    }
    nav.open(&args.path).await?;

    let node = nav.node().ok_or("configuration branch not loaded")?;
    let mut out = format_tree_node(&nav.title(), &node);
    if node.has_exact_module {
        out.push_str(&format_module_fields(&nav.editor().state()));
    }
    Ok(out)
}

pub async fn handle_cfg_show(
    session: &ConsoleSession,
    args: &CfgShowArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let editor = session.flowcfg.editor();
    editor.load(&args.module).await?;
    let state = editor.state();
    if state.module.is_none() {
        return Err(state.status.into());
    }

    if args.json {
        // Shows what the device sent; masked secrets stay masked.
        Ok(serde_json::to_string_pretty(&state.baseline)?)
    } else {
        Ok(format_module_fields(&state))
    }
}

pub async fn handle_cfg_set(
    session: &ConsoleSession,
    args: &CfgSetArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let module = normalize_path(&args.module);
    let editor = session.flowcfg.editor();
    editor.load(&module).await?;
    if editor.current_module().is_none() {
        return Err("no configuration module selected".into());
    }

    let state = editor.state();
    for raw in &args.assignments {
        let (key, value) = parse_assignment(raw)?;
        let is_toggle = state
            .fields
            .iter()
            .any(|f| f.key == key && f.kind == FieldKind::Bool);
        if is_toggle {
            let checked = crate::device::lenient::to_bool(&serde_json::Value::String(
                value.to_string(),
            ));
            editor.set_checked(key, checked)?;
        } else {
            editor.set_text(key, value)?;
        }
    }

    editor.apply().await?;
    Ok(format!(
        "{}\n{}",
        editor.state().status,
        format_module_fields(&editor.state())
    ))
}
