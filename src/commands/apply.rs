//! status / diff / apply: the declarative surface.
//!
//! All three run the same converge loop; status and diff force dry-run and
//! differ only in what they print, apply mutates unless --dry-run is set.

use crate::state::{StateOutcome, Summary};
use crate::statefile::StateFile;
use crate::ui;
use anyhow::{Result, bail};
use reconcile::{ReconcileOptions, Transport};
use std::path::Path;

fn converge(
    transport: &dyn Transport,
    state: &StateFile,
    opts: ReconcileOptions,
) -> (Vec<StateOutcome>, Summary) {
    let mut outcomes = Vec::new();
    let mut summary = Summary::default();
    for resource in state.resources() {
        log::info!("reconciling {} `{}`", resource.label(), resource.id());
        let outcome = resource.apply(transport, opts);
        summary.record(&outcome);
        outcomes.push(outcome);
    }
    (outcomes, summary)
}

fn emit(
    outcomes: &[StateOutcome],
    summary: &Summary,
    json: bool,
    show_unchanged: bool,
    dry_run: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
        return Ok(());
    }
    for outcome in outcomes {
        ui::display_outcome(outcome, show_unchanged);
    }
    ui::display_summary(summary, dry_run);
    Ok(())
}

fn fail_on_errors(summary: &Summary) -> Result<()> {
    if summary.failed > 0 {
        bail!("{} resource(s) failed to converge", summary.failed);
    }
    Ok(())
}

/// Compare every declared resource against the server, mutating nothing.
pub fn status(transport: &dyn Transport, file: &Path, json: bool) -> Result<()> {
    let state = StateFile::load(file)?;
    let (outcomes, summary) = converge(transport, &state, ReconcileOptions::dry_run());
    if !json {
        ui::header("Status");
    }
    emit(&outcomes, &summary, json, true, true)?;
    fail_on_errors(&summary)
}

/// Which outcomes a diff listing keeps: pending changes, and failures even
/// when their change set is empty (an unreachable describe has no diff but
/// still needs surfacing).
fn notable(outcome: &StateOutcome) -> bool {
    outcome.is_change() || outcome.is_failure()
}

/// Like status, but only the resources that would change.
pub fn diff(transport: &dyn Transport, file: &Path, json: bool) -> Result<()> {
    let state = StateFile::load(file)?;
    let (mut outcomes, summary) = converge(transport, &state, ReconcileOptions::dry_run());
    outcomes.retain(notable);
    if !json && outcomes.is_empty() {
        ui::success("No changes needed");
        return fail_on_errors(&summary);
    }
    emit(&outcomes, &summary, json, false, true)?;
    fail_on_errors(&summary)
}

/// Converge the server towards the state file.
pub fn apply(transport: &dyn Transport, file: &Path, dry_run: bool, json: bool) -> Result<()> {
    let state = StateFile::load(file)?;
    if state.is_empty() {
        ui::warn("state file declares no resources");
        return Ok(());
    }
    let opts = ReconcileOptions { dry_run };
    let (outcomes, summary) = converge(transport, &state, opts);
    emit(&outcomes, &summary, json, true, dry_run)?;
    fail_on_errors(&summary)
}
