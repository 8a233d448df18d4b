//! Core types for desired-state reconciliation.

use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of a single reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Live state already matches desired state.
    Unchanged,
    /// Differences were found but not applied (dry run).
    WouldChange,
    /// Differences were applied and confirmed by a re-describe.
    Changed,
    /// The pass failed; see the attached error.
    Failed,
}

impl Outcome {
    /// Check if the outcome represents success (no failure).
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    /// Check if the outcome represents an applied or pending change.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed | Self::WouldChange)
    }
}

/// A single field-level difference between desired and observed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Previous value as reported by the server; `Null` when the resource
    /// (or field) was absent.
    pub old: Value,
    /// Value the field is being set to. Redacted for secret fields.
    pub new: Value,
}

/// The set of field-level differences computed for one reconcile call,
/// keyed by dotted field path. Ordered so reports are stable.
pub type ChangeSet = BTreeMap<String, FieldChange>;

/// The only output of the reconciliation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileResult {
    /// What happened.
    pub outcome: Outcome,
    /// Field-level differences found (and, unless dry-run, applied).
    pub changes: ChangeSet,
    /// Present when `outcome` is [`Outcome::Failed`].
    pub error: Option<ReconcileError>,
}

impl ReconcileResult {
    /// A result with no differences.
    pub fn unchanged() -> Self {
        Self {
            outcome: Outcome::Unchanged,
            changes: ChangeSet::new(),
            error: None,
        }
    }

    /// A dry-run result carrying the differences that would be applied.
    pub fn would_change(changes: ChangeSet) -> Self {
        Self {
            outcome: Outcome::WouldChange,
            changes,
            error: None,
        }
    }

    /// A live result carrying the applied differences.
    pub fn changed(changes: ChangeSet) -> Self {
        Self {
            outcome: Outcome::Changed,
            changes,
            error: None,
        }
    }

    /// A failed result. The changes computed before the failure are kept
    /// for reporting.
    pub fn failed(changes: ChangeSet, error: ReconcileError) -> Self {
        Self {
            outcome: Outcome::Failed,
            changes,
            error: Some(error),
        }
    }

    /// Check if the pass succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Options governing a reconcile pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Compute differences but perform no mutating call.
    pub dry_run: bool,
}

impl ReconcileOptions {
    /// Options for a plan-only pass.
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}
