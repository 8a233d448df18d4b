//! Host-engine result shape.
//!
//! Every resource converge collapses into the same four-key record: name,
//! tri-state result (`null` meaning "would change"), human comment, and the
//! field-level change set. Failures carry a structured error alongside.

use reconcile::{ChangeSet, FieldChange, Outcome, ReconcileError, ReconcileResult};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct StateError {
    /// HTTP status, or -1 when the server was unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    pub msg: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateOutcome {
    pub name: String,
    /// `Some(true)` success, `Some(false)` failure, `None` dry-run pending.
    pub result: Option<bool>,
    pub comment: String,
    pub changes: ChangeSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StateError>,
}

impl StateOutcome {
    pub fn from_result(label: &str, name: &str, result: ReconcileResult) -> Self {
        let count = result.changes.len();
        let (outcome_result, comment, error) = match result.outcome {
            Outcome::Unchanged => (
                Some(true),
                format!("{label} `{name}` is in the desired state"),
                None,
            ),
            Outcome::WouldChange => (
                None,
                format!("{label} `{name}` would change {count} field(s)"),
                None,
            ),
            Outcome::Changed => (
                Some(true),
                format!("{label} `{name}` changed {count} field(s)"),
                None,
            ),
            Outcome::Failed => {
                let error = result.error.as_ref();
                let msg = error.map_or_else(
                    || "reconciliation failed".to_string(),
                    ReconcileError::to_string,
                );
                let code = error.and_then(ReconcileError::status);
                (
                    Some(false),
                    format!("{label} `{name}`: {msg}"),
                    Some(StateError { code, msg }),
                )
            }
        };
        StateOutcome {
            name: name.to_string(),
            result: outcome_result,
            comment,
            changes: result.changes,
            error,
        }
    }

    /// Record an extra field change applied outside the core reconcile.
    pub fn note_changed(&mut self, field: &str, new: Value) {
        self.changes.insert(
            field.to_string(),
            FieldChange {
                old: Value::Null,
                new,
            },
        );
        if self.changes.len() == 1 && self.result == Some(true) {
            self.comment = format!("{} ({field} updated)", self.comment);
        }
    }

    /// Record a change a dry run would apply outside the core reconcile.
    pub fn note_would_change(&mut self, field: &str, new: Value) {
        self.changes.insert(
            field.to_string(),
            FieldChange {
                old: Value::Null,
                new,
            },
        );
        self.result = None;
    }

    /// Downgrade the outcome to a failure after a follow-up call failed.
    pub fn fail(&mut self, comment: String, code: i32, msg: String) {
        self.result = Some(false);
        self.comment = comment;
        self.error = Some(StateError {
            code: Some(code),
            msg,
        });
    }

    pub fn is_failure(&self) -> bool {
        self.result == Some(false)
    }

    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    pub fn is_change(&self) -> bool {
        !self.changes.is_empty() || self.is_pending()
    }
}

/// Roll-up across a whole state file run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Summary {
    pub unchanged: usize,
    pub changed: usize,
    pub pending: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &StateOutcome) {
        match outcome.result {
            Some(false) => self.failed += 1,
            None => self.pending += 1,
            Some(true) if outcome.changes.is_empty() => self.unchanged += 1,
            Some(true) => self.changed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.unchanged + self.changed + self.pending + self.failed
    }
}
