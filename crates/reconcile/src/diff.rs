//! Field-level diff computation between desired and observed state.
//!
//! Comparison rules:
//! - strings/numbers/bools compare by exact value (numbers numerically, so a
//!   server echoing `5000000.0` does not diff against `5000000`)
//! - lists compare as ordered sequences; reordering is a change
//! - fields unset in the desired record are skipped, never "clear to null"
//! - secret fields the server does not echo are always treated as changed
//!   when supplied, with values redacted in the reported change set

use crate::descriptor::Descriptor;
use crate::types::{ChangeSet, FieldChange};
use serde_json::Value;

/// Placeholder reported in change sets for secret values.
pub const REDACTED: &str = "********";

/// Look up a dotted field path in a JSON object.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Set a dotted field path in a JSON object, creating intermediate objects.
pub fn insert_path(value: &mut Value, path: &str, new: Value) {
    let mut current = value;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        let map = current
            .as_object_mut()
            .unwrap_or_else(|| unreachable!("just coerced to object"));
        if segments.peek().is_none() {
            map.insert(segment.to_string(), new);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}

/// Remove a dotted field path from a JSON object, if present.
pub fn remove_path(value: &mut Value, path: &str) {
    let Some((parent_path, leaf)) = path.rsplit_once('.') else {
        if let Some(map) = value.as_object_mut() {
            map.remove(path);
        }
        return;
    };
    let mut current = value;
    for segment in parent_path.split('.') {
        let Some(next) = current.as_object_mut().and_then(|m| m.get_mut(segment)) else {
            return;
        };
        current = next;
    }
    if let Some(map) = current.as_object_mut() {
        map.remove(leaf);
    }
}

/// Value equality with numeric normalization. Arrays compare element-wise in
/// order; objects compare key-wise.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Compute the differences between a desired record and the observed body.
///
/// Only the descriptor's diffable fields participate, and only those the
/// caller actually supplied. Secret fields supplied in the desired record are
/// appended as changes unconditionally since the server cannot confirm them.
pub fn diff(desc: &Descriptor, desired: &Value, observed: &Value) -> ChangeSet {
    let mut changes = ChangeSet::new();

    for field in desc.diff_fields {
        let Some(want) = lookup(desired, field) else {
            continue;
        };
        let have = lookup(observed, field).unwrap_or(&Value::Null);
        if !values_equal(want, have) {
            changes.insert(
                (*field).to_string(),
                FieldChange {
                    old: have.clone(),
                    new: want.clone(),
                },
            );
        }
    }

    for field in desc.secret_fields {
        // Create-only secrets cannot be re-applied through the update
        // endpoint, so they are excluded from update diffs.
        if desc.create_only.contains(field) {
            continue;
        }
        if lookup(desired, field).is_some() {
            changes.insert(
                (*field).to_string(),
                FieldChange {
                    old: Value::Null,
                    new: Value::String(REDACTED.to_string()),
                },
            );
        }
    }

    changes
}

/// Compute the creation change set for an absent resource: every supplied
/// leaf field counts as a change from nothing.
pub fn creation_changes(desc: &Descriptor, desired: &Value) -> ChangeSet {
    let mut changes = ChangeSet::new();
    let mut leaves = Vec::new();
    flatten("", desired, &mut leaves);
    for (path, value) in leaves {
        let new = if desc.is_secret(&path) {
            Value::String(REDACTED.to_string())
        } else {
            value
        };
        changes.insert(
            path,
            FieldChange {
                old: Value::Null,
                new,
            },
        );
    }
    changes
}

/// Collect the leaf paths of a JSON object. Arrays are leaves (they diff as
/// whole ordered sequences).
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ResourceKind, descriptor};
    use serde_json::json;

    #[test]
    fn lookup_dotted_paths() {
        let value = json!({"softQuota": {"type": "spaceRemainingQuota", "limit": 5000000}});
        assert_eq!(
            lookup(&value, "softQuota.limit").unwrap(),
            &json!(5000000)
        );
        assert!(lookup(&value, "softQuota.size").is_none());
        assert!(lookup(&value, "missing.path").is_none());
    }

    #[test]
    fn insert_creates_intermediate_objects() {
        let mut value = json!({});
        insert_path(&mut value, "storage.writePolicy", json!("ALLOW"));
        assert_eq!(value, json!({"storage": {"writePolicy": "ALLOW"}}));
    }

    #[test]
    fn remove_leaf_and_top_level() {
        let mut value = json!({"type": "File", "softQuota": {"limit": 1}});
        remove_path(&mut value, "softQuota.limit");
        remove_path(&mut value, "type");
        assert_eq!(value, json!({"softQuota": {}}));
    }

    #[test]
    fn numeric_equality_normalizes() {
        assert!(values_equal(&json!(5000000), &json!(5000000.0)));
        assert!(!values_equal(&json!(5000000), &json!(5000001)));
    }

    #[test]
    fn list_reorder_is_a_change() {
        let desc = descriptor(ResourceKind::RealmSet);
        let desired = json!({"active": ["NexusAuthenticatingRealm", "DockerToken"]});
        let observed = json!({"active": ["DockerToken", "NexusAuthenticatingRealm"]});
        let changes = diff(desc, &desired, &observed);
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key("active"));
    }

    #[test]
    fn unset_desired_fields_are_skipped() {
        let desc = descriptor(ResourceKind::User);
        let desired = json!({"firstName": "Test"});
        let observed = json!({"firstName": "Test", "lastName": "User", "status": "active"});
        assert!(diff(desc, &desired, &observed).is_empty());
    }

    #[test]
    fn missing_observed_field_diffs_against_null() {
        let desc = descriptor(ResourceKind::Blobstore);
        let desired = json!({"softQuota": {"type": "spaceUsedQuota", "limit": 2000000}});
        let observed = json!({"name": "default", "type": "File", "path": "/nexus-data/blobs/default"});
        let changes = diff(desc, &desired, &observed);
        assert_eq!(changes["softQuota.type"].old, Value::Null);
        assert_eq!(changes["softQuota.limit"].new, json!(2000000));
    }

    #[test]
    fn secrets_always_diff_and_are_redacted() {
        let desc = descriptor(ResourceKind::EmailConfig);
        let desired = json!({"host": "smtp.example.com", "password": "hunter2"});
        let observed = json!({"host": "smtp.example.com"});
        let changes = diff(desc, &desired, &observed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["password"].new, json!(REDACTED));
    }

    #[test]
    fn create_only_secrets_do_not_drift_on_update() {
        let desc = descriptor(ResourceKind::User);
        let desired = json!({"firstName": "Test", "password": "hunter2"});
        let observed = json!({"firstName": "Test", "lastName": "User"});
        assert!(diff(desc, &desired, &observed).is_empty());

        let changes = creation_changes(desc, &desired);
        assert_eq!(changes["password"].new, json!(REDACTED));
    }

    #[test]
    fn creation_changes_flatten_and_redact() {
        let desc = descriptor(ResourceKind::EmailConfig);
        let desired = json!({"enabled": true, "host": "smtp.example.com", "password": "hunter2"});
        let changes = creation_changes(desc, &desired);
        assert_eq!(changes["host"].new, json!("smtp.example.com"));
        assert_eq!(changes["password"].new, json!(REDACTED));
        assert_eq!(changes["enabled"].old, Value::Null);
    }
}
