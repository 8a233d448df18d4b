//! Script API subcommands.

use crate::script::{ScriptClient, UploadOutcome};
use crate::ui;
use anyhow::{Context, Result};
use reconcile::Transport;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn list(transport: &dyn Transport) -> Result<()> {
    let client = ScriptClient::new(transport);
    let scripts = client.list()?;
    if scripts.is_empty() {
        ui::info("no scripts stored");
        return Ok(());
    }
    for script in scripts {
        println!("{}  ({})", script.name, script.script_type);
    }
    Ok(())
}

pub fn get(transport: &dyn Transport, name: &str) -> Result<()> {
    let client = ScriptClient::new(transport);
    match client.get(name)? {
        Some(script) => {
            println!("{}", script.content);
            Ok(())
        }
        None => anyhow::bail!("script `{name}` not found"),
    }
}

pub fn upload(transport: &dyn Transport, name: &str, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read script source {}", file.display()))?;
    let client = ScriptClient::new(transport);
    match client.upload(name, &content)? {
        UploadOutcome::Created => ui::success(&format!("script `{name}` uploaded")),
        UploadOutcome::Updated => ui::success(&format!("script `{name}` updated")),
        UploadOutcome::Unchanged => ui::info(&format!("script `{name}` already up to date")),
    }
    Ok(())
}

pub fn run(transport: &dyn Transport, name: &str, args: &str) -> Result<()> {
    let args: Value =
        serde_json::from_str(args).context("script arguments must be a JSON value")?;
    let client = ScriptClient::new(transport);
    let result = client.run(name, &args)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn delete(transport: &dyn Transport, name: &str) -> Result<()> {
    let client = ScriptClient::new(transport);
    if client.delete(name)? {
        ui::success(&format!("script `{name}` deleted"));
    } else {
        ui::info(&format!("script `{name}` does not exist"));
    }
    Ok(())
}
