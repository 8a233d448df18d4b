//! Administration that only the Script API reaches: the base URL capability
//! and scheduled tasks.

use crate::cli::TaskArgs;
use crate::groovy;
use crate::script::ScriptClient;
use crate::ui;
use anyhow::{Context, Result};
use reconcile::Transport;
use serde_json::Value;

pub fn base_url(transport: &dyn Transport, url: &str) -> Result<()> {
    let client = ScriptClient::new(transport);
    client.execute(
        groovy::SETUP_BASE_URL_NAME,
        groovy::SETUP_BASE_URL,
        &groovy::base_url_args(url),
    )?;
    ui::success(&format!("base url set to {url}"));
    Ok(())
}

pub fn task(transport: &dyn Transport, args: &TaskArgs) -> Result<()> {
    let properties: Value = serde_json::from_str(&args.properties)
        .context("task properties must be a JSON object")?;
    if !properties.is_object() {
        anyhow::bail!("task properties must be a JSON object");
    }
    let script_args = groovy::task_args(
        &args.name,
        &args.type_id,
        &properties,
        &args.cron,
        args.alert_email.as_deref(),
    );
    let client = ScriptClient::new(transport);
    client.execute(groovy::CREATE_TASK_NAME, groovy::CREATE_TASK, &script_args)?;
    ui::success(&format!("task `{}` scheduled ({})", args.name, args.cron));
    Ok(())
}
