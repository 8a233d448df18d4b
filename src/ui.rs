#![allow(dead_code)]

use crate::state::{StateOutcome, Summary};
use colored::Colorize;
use serde_json::Value;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.len()).dimmed());
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "(unset)".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Print one converge outcome with its field changes.
pub fn display_outcome(outcome: &StateOutcome, show_unchanged: bool) {
    let symbol = match outcome.result {
        Some(false) => "✗".red(),
        None => "~".yellow(),
        Some(true) if outcome.changes.is_empty() => {
            if !show_unchanged {
                return;
            }
            "✓".green()
        }
        Some(true) => "+".green(),
    };
    println!("{} {}", symbol, outcome.comment);
    for (field, change) in &outcome.changes {
        println!(
            "    {} {} {} {}",
            field.dimmed(),
            render_value(&change.old).red(),
            "→".dimmed(),
            render_value(&change.new).green()
        );
    }
    if let Some(error) = &outcome.error {
        println!("    {}", error.msg.red());
    }
}

/// Print the roll-up line after a run.
pub fn display_summary(summary: &Summary, dry_run: bool) {
    println!();
    let mut parts = vec![format!("{} unchanged", summary.unchanged)];
    if dry_run {
        parts.push(format!("{} would change", summary.pending));
    } else {
        parts.push(format!("{} changed", summary.changed));
    }
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed));
    }
    let line = format!("{} resource(s): {}", summary.total(), parts.join(", "));
    if summary.failed > 0 {
        error(&line);
    } else {
        success(&line);
    }
}
