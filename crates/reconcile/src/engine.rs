//! The reconciliation engine: describe current state, diff against desired,
//! converge.
//!
//! Each call is independent and terminal: at most two network round trips
//! (describe, then create/update/delete) plus a confirming re-describe, all
//! sequential on the caller's thread. No retries, no locking; the server is
//! the arbiter of concurrent writers.

use crate::descriptor::{Describe, Descriptor, PathParams, ResourceKind, descriptor, render_path};
use crate::diff::{creation_changes, diff, insert_path, lookup, remove_path};
use crate::error::{ReconcileError, Result};
use crate::transport::{Method, Payload, Response, Transport};
use crate::types::{ChangeSet, FieldChange, ReconcileOptions, ReconcileResult};
use serde_json::Value;

/// The caller-declared desired state of one resource instance.
///
/// `fields` uses the describe-side wire names (the descriptor's alias table
/// handles create-side renames); unset fields are simply absent from the
/// object, which is distinct from explicitly carrying `null`.
#[derive(Debug, Clone)]
pub struct DesiredState {
    pub kind: ResourceKind,
    pub identity: String,
    pub fields: Value,
    /// Endpoint path parameters (`{format}`, `{type}`, `{store_type}`,
    /// `{ptype}`) supplied by the per-resource adapter.
    pub params: PathParams,
}

impl DesiredState {
    /// Build a desired state with no path parameters.
    pub fn new(kind: ResourceKind, identity: impl Into<String>, fields: Value) -> Self {
        Self {
            kind,
            identity: identity.into(),
            fields,
            params: PathParams::new(),
        }
    }

    /// Attach a path parameter.
    pub fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.insert(key, value.into());
        self
    }
}

/// The live resource as observed by a describe call. Absence is represented
/// distinctly from an empty body.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedState {
    Absent,
    Present(Value),
}

/// Observe the current state of a resource.
///
/// Absent is either a 404 or a missing entry in a bulk listing, depending on
/// the kind's describe strategy. Transport failure and unexpected statuses
/// are errors, not absence.
pub fn observe<T: Transport>(
    transport: &T,
    desc: &Descriptor,
    identity: &str,
    params: &PathParams,
) -> Result<ObservedState> {
    match desc.describe {
        Describe::Get { path } => {
            let path = render_path(path, identity, params)?;
            let resp = transport.request(Method::Get, &path, None);
            match resp.status {
                200 => Ok(ObservedState::Present(wrap_body(desc, decode(&resp)?))),
                404 => Ok(ObservedState::Absent),
                _ => Err(status_error(&resp)),
            }
        }
        Describe::ListFilter { path, key } => {
            let path = render_path(path, identity, params)?;
            let resp = transport.request(Method::Get, &path, None);
            match resp.status {
                200 => {
                    let listing = decode(&resp)?;
                    let found = listing
                        .as_array()
                        .ok_or_else(|| {
                            ReconcileError::InvalidBody(format!(
                                "expected a listing at {path}, got: {}",
                                resp.body_str()
                            ))
                        })?
                        .iter()
                        .find(|item| item.get(key).and_then(Value::as_str) == Some(identity));
                    Ok(found.map_or(ObservedState::Absent, |item| {
                        ObservedState::Present(item.clone())
                    }))
                }
                404 => Ok(ObservedState::Absent),
                _ => Err(status_error(&resp)),
            }
        }
    }
}

/// Reconcile one resource towards its desired state.
///
/// The five-branch decision: absent+create, present+match, present+diff,
/// immutable-field fast-fail, and (under `dry_run`) plan-only reporting.
/// Always returns a structured result; never panics on server behavior.
pub fn reconcile<T: Transport>(
    transport: &T,
    desired: &DesiredState,
    opts: ReconcileOptions,
) -> ReconcileResult {
    let desc = descriptor(desired.kind);

    let observed = match observe(transport, desc, &desired.identity, &desired.params) {
        Ok(observed) => observed,
        Err(err) => return ReconcileResult::failed(ChangeSet::new(), err),
    };

    match observed {
        ObservedState::Absent => {
            let changes = creation_changes(desc, &desired.fields);
            if opts.dry_run {
                return ReconcileResult::would_change(changes);
            }
            create(transport, desc, desired, changes)
        }
        ObservedState::Present(body) => {
            let changes = diff(desc, &desired.fields, &body);
            if changes.is_empty() {
                return ReconcileResult::unchanged();
            }

            // Checked before the dry-run/live branch so a plan surfaces the
            // same error a real run would.
            if let Some(field) = changes.keys().find(|f| desc.is_immutable(f)) {
                return ReconcileResult::failed(
                    changes.clone(),
                    ReconcileError::ImmutableFieldChanged {
                        field: field.clone(),
                        kind: desired.kind,
                        identity: desired.identity.clone(),
                    },
                );
            }

            if opts.dry_run {
                return ReconcileResult::would_change(changes);
            }
            update(transport, desc, desired, &body, changes)
        }
    }
}

/// Converge a resource to absence. Already-absent is `Unchanged` and issues
/// no DELETE.
pub fn ensure_absent<T: Transport>(
    transport: &T,
    kind: ResourceKind,
    identity: &str,
    params: &PathParams,
    opts: ReconcileOptions,
) -> ReconcileResult {
    let desc = descriptor(kind);

    let observed = match observe(transport, desc, identity, params) {
        Ok(observed) => observed,
        Err(err) => return ReconcileResult::failed(ChangeSet::new(), err),
    };

    let ObservedState::Present(body) = observed else {
        return ReconcileResult::unchanged();
    };

    let mut changes = ChangeSet::new();
    let old = lookup(&body, desc.identity_field)
        .cloned()
        .unwrap_or_else(|| Value::String(identity.to_string()));
    changes.insert(
        desc.identity_field.to_string(),
        FieldChange {
            old,
            new: Value::Null,
        },
    );

    let Some(endpoint) = desc.delete else {
        return ReconcileResult::failed(
            changes,
            ReconcileError::UnsupportedOperation {
                kind,
                operation: "delete",
            },
        );
    };

    if opts.dry_run {
        return ReconcileResult::would_change(changes);
    }

    let path = match render_path(endpoint.path, identity, params) {
        Ok(path) => path,
        Err(err) => return ReconcileResult::failed(changes, err),
    };
    let resp = transport.request(endpoint.method, &path, None);
    // A 404 between describe and delete means someone else removed it; the
    // goal state holds either way.
    if endpoint.ok.contains(&resp.status) || resp.status == 404 {
        ReconcileResult::changed(changes)
    } else {
        ReconcileResult::failed(changes, status_error(&resp))
    }
}

fn create<T: Transport>(
    transport: &T,
    desc: &Descriptor,
    desired: &DesiredState,
    changes: ChangeSet,
) -> ReconcileResult {
    let body = create_body(desc, &desired.fields);

    let path = match render_path(desc.create.path, &desired.identity, &desired.params) {
        Ok(path) => path,
        Err(err) => return ReconcileResult::failed(changes, err),
    };
    let resp = transport.request(desc.create.method, &path, Some(&Payload::Json(body)));
    if !desc.create.ok.contains(&resp.status) {
        return ReconcileResult::failed(changes, status_error(&resp));
    }

    confirm(transport, desc, desired, changes, "create")
}

fn update<T: Transport>(
    transport: &T,
    desc: &Descriptor,
    desired: &DesiredState,
    observed: &Value,
    changes: ChangeSet,
) -> ReconcileResult {
    // Servers generally require the complete resource representation on
    // update, so merge the changed fields onto the full observed body.
    let mut merged = observed.clone();
    for field in changes.keys() {
        if let Some(value) = lookup(&desired.fields, field) {
            insert_path(&mut merged, field, value.clone());
        }
    }
    for field in desc.create_only {
        remove_path(&mut merged, field);
    }
    let body = unwrap_body(desc, merged);

    let path = match render_path(desc.update.path, &desired.identity, &desired.params) {
        Ok(path) => path,
        Err(err) => return ReconcileResult::failed(changes, err),
    };
    let resp = transport.request(desc.update.method, &path, Some(&Payload::Json(body)));
    if !desc.update.ok.contains(&resp.status) {
        return ReconcileResult::failed(changes, status_error(&resp));
    }

    confirm(transport, desc, desired, changes, "update")
}

/// Re-describe after a mutation to confirm the applied state.
fn confirm<T: Transport>(
    transport: &T,
    desc: &Descriptor,
    desired: &DesiredState,
    changes: ChangeSet,
    operation: &str,
) -> ReconcileResult {
    match observe(transport, desc, &desired.identity, &desired.params) {
        Ok(ObservedState::Present(_)) => ReconcileResult::changed(changes),
        Ok(ObservedState::Absent) => ReconcileResult::failed(
            changes,
            ReconcileError::InvalidBody(format!(
                "{} `{}` not present after {operation}",
                desc.kind, desired.identity
            )),
        ),
        Err(err) => ReconcileResult::failed(changes, err),
    }
}

/// Build the creation payload: desired fields with path-encoded fields
/// stripped and create-side renames applied, unwrapped for bare-array kinds.
fn create_body(desc: &Descriptor, fields: &Value) -> Value {
    let mut body = fields.clone();
    for field in desc.create_strip {
        remove_path(&mut body, field);
    }
    for (describe_name, create_name) in desc.create_aliases {
        if let Some(value) = lookup(&body, describe_name).cloned() {
            remove_path(&mut body, describe_name);
            insert_path(&mut body, create_name, value);
        }
    }
    unwrap_body(desc, body)
}

fn wrap_body(desc: &Descriptor, body: Value) -> Value {
    match desc.body_field {
        Some(field) => {
            let mut wrapped = Value::Object(serde_json::Map::new());
            insert_path(&mut wrapped, field, body);
            wrapped
        }
        None => body,
    }
}

fn unwrap_body(desc: &Descriptor, body: Value) -> Value {
    match desc.body_field {
        Some(field) => lookup(&body, field).cloned().unwrap_or(Value::Null),
        None => body,
    }
}

fn decode(resp: &Response) -> Result<Value> {
    resp.body_json()
        .map_err(|e| ReconcileError::InvalidBody(e.to_string()))
}

fn status_error(resp: &Response) -> ReconcileError {
    if resp.is_reachable() {
        ReconcileError::Http {
            status: resp.status,
            body: resp.body_str(),
        }
    } else {
        ReconcileError::TransportUnreachable {
            message: resp.body_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Transport double: canned responses per (method, path), consumed in
    /// order with the last repeating; records every call it receives.
    #[derive(Default)]
    struct MockTransport {
        routes: HashMap<(Method, String), RefCell<Vec<Response>>>,
        calls: RefCell<Vec<(Method, String, Option<Payload>)>>,
    }

    impl MockTransport {
        fn route(mut self, method: Method, path: &str, responses: Vec<Response>) -> Self {
            self.routes
                .insert((method, path.to_string()), RefCell::new(responses));
            self
        }

        fn mutating_calls(&self) -> Vec<(Method, String)> {
            self.calls
                .borrow()
                .iter()
                .filter(|(m, _, _)| m.is_mutating())
                .map(|(m, p, _)| (*m, p.clone()))
                .collect()
        }

        fn payload_for(&self, method: Method, path: &str) -> Option<Payload> {
            self.calls
                .borrow()
                .iter()
                .find(|(m, p, _)| *m == method && p == path)
                .and_then(|(_, _, payload)| payload.clone())
        }
    }

    impl Transport for MockTransport {
        fn request(&self, method: Method, path: &str, payload: Option<&Payload>) -> Response {
            self.calls
                .borrow_mut()
                .push((method, path.to_string(), payload.cloned()));
            match self.routes.get(&(method, path.to_string())) {
                Some(cell) => {
                    let mut queued = cell.borrow_mut();
                    if queued.len() > 1 {
                        queued.remove(0)
                    } else {
                        queued[0].clone()
                    }
                }
                None => Response::new(404, Vec::new()),
            }
        }
    }

    fn json_response(status: i32, value: Value) -> Response {
        Response::new(status, serde_json::to_vec(&value).unwrap())
    }

    fn blobstore_desired() -> DesiredState {
        DesiredState::new(
            ResourceKind::Blobstore,
            "build-cache",
            json!({
                "name": "build-cache",
                "type": "File",
                "path": "/nexus-data/blobs/build-cache",
                "softQuota": {"type": "spaceRemainingQuota", "limit": 5000000},
            }),
        )
        .with_param("store_type", "file")
    }

    // The bulk listing shape: usage counters but no `path`.
    fn blobstore_observed() -> Value {
        json!({
            "name": "build-cache",
            "type": "File",
            "unavailable": false,
            "blobCount": 14,
            "totalSizeInBytes": 4096,
            "availableSpaceInBytes": 9000000,
            "softQuota": {"type": "spaceRemainingQuota", "limit": 5000000},
        })
    }

    fn yum_desired() -> DesiredState {
        DesiredState::new(
            ResourceKind::Repository,
            "test-yum",
            json!({
                "name": "test-yum",
                "format": "yum",
                "type": "hosted",
                "yum": {"repodataDepth": 3, "deployPolicy": "PERMISSIVE"},
            }),
        )
        .with_param("format", "yum")
        .with_param("type", "hosted")
    }

    fn yum_observed() -> Value {
        json!({
            "name": "test-yum",
            "format": "yum",
            "type": "hosted",
            "online": true,
            "storage": {"blobStoreName": "default", "strictContentTypeValidation": true, "writePolicy": "ALLOW_ONCE"},
            "yum": {"repodataDepth": 0, "deployPolicy": "STRICT"},
        })
    }

    #[test]
    fn create_blobstore_with_quota() {
        // Scenario: absent blobstore, create succeeds, re-describe confirms.
        let transport = MockTransport::default()
            .route(
                Method::Get,
                "beta/blobstores",
                vec![
                    json_response(200, json!([])),
                    json_response(200, json!([blobstore_observed()])),
                ],
            )
            .route(Method::Post, "beta/blobstores/file", vec![Response::new(204, Vec::new())]);

        let result = reconcile(&transport, &blobstore_desired(), ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Changed);
        assert_eq!(result.changes["softQuota.limit"].new, json!(5000000));
        assert_eq!(result.changes["softQuota.type"].new, json!("spaceRemainingQuota"));

        // Create body sends the quota limit under the create-side name and
        // omits the path-encoded store type.
        let Some(Payload::Json(body)) = transport.payload_for(Method::Post, "beta/blobstores/file")
        else {
            panic!("expected a JSON create payload");
        };
        assert_eq!(body["softQuota"]["size"], json!(5000000));
        assert!(body["softQuota"].get("limit").is_none());
        assert!(body.get("type").is_none());
    }

    #[test]
    fn reconcile_is_idempotent_once_converged() {
        // Fields the listing never echoes (the file path) must not diff.
        let transport = MockTransport::default().route(
            Method::Get,
            "beta/blobstores",
            vec![json_response(200, json!([blobstore_observed()]))],
        );

        let result = reconcile(&transport, &blobstore_desired(), ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Unchanged);
        assert!(result.changes.is_empty());
        assert!(transport.mutating_calls().is_empty());
    }

    #[test]
    fn dry_run_reports_creation_without_mutating() {
        let transport = MockTransport::default().route(
            Method::Get,
            "beta/blobstores",
            vec![json_response(200, json!([]))],
        );

        let result = reconcile(&transport, &blobstore_desired(), ReconcileOptions::dry_run());
        assert_eq!(result.outcome, Outcome::WouldChange);
        assert_eq!(result.changes["path"].new, json!("/nexus-data/blobs/build-cache"));
        assert!(transport.mutating_calls().is_empty());
    }

    #[test]
    fn yum_policy_update_dry_run_then_live() {
        // Scenario: hosted yum repo holds repodataDepth=0/STRICT, desired is
        // 3/PERMISSIVE. Dry run plans the same change set the live run applies.
        let observed_list = json_response(200, json!([yum_observed()]));
        let dry = MockTransport::default().route(
            Method::Get,
            "beta/repositories",
            vec![observed_list.clone()],
        );
        let planned = reconcile(&dry, &yum_desired(), ReconcileOptions::dry_run());
        assert_eq!(planned.outcome, Outcome::WouldChange);
        assert_eq!(planned.changes["yum.repodataDepth"].old, json!(0));
        assert_eq!(planned.changes["yum.repodataDepth"].new, json!(3));
        assert_eq!(planned.changes["yum.deployPolicy"].old, json!("STRICT"));
        assert_eq!(planned.changes["yum.deployPolicy"].new, json!("PERMISSIVE"));
        assert!(dry.mutating_calls().is_empty());

        let live = MockTransport::default()
            .route(Method::Get, "beta/repositories", vec![observed_list])
            .route(
                Method::Put,
                "beta/repositories/yum/hosted/test-yum",
                vec![Response::new(204, Vec::new())],
            );
        let applied = reconcile(&live, &yum_desired(), ReconcileOptions::default());
        assert_eq!(applied.outcome, Outcome::Changed);
        assert_eq!(applied.changes, planned.changes);

        // The update merged changed fields onto the full observed body.
        let Some(Payload::Json(body)) =
            live.payload_for(Method::Put, "beta/repositories/yum/hosted/test-yum")
        else {
            panic!("expected a JSON update payload");
        };
        assert_eq!(body["yum"]["repodataDepth"], json!(3));
        assert_eq!(body["storage"]["blobStoreName"], json!("default"));
    }

    #[test]
    fn immutable_field_fails_before_any_mutation() {
        // Scenario: attempt to flip a repository's format. Fails identically
        // under dry run and live, with only the describe on the wire.
        let mut desired = yum_desired();
        insert_path(&mut desired.fields, "format", json!("maven2"));

        for opts in [ReconcileOptions::dry_run(), ReconcileOptions::default()] {
            let transport = MockTransport::default().route(
                Method::Get,
                "beta/repositories",
                vec![json_response(200, json!([yum_observed()]))],
            );
            let result = reconcile(&transport, &desired, opts);
            assert_eq!(result.outcome, Outcome::Failed);
            assert!(matches!(
                result.error,
                Some(ReconcileError::ImmutableFieldChanged { ref field, .. }) if field == "format"
            ));
            assert!(transport.mutating_calls().is_empty());
        }
    }

    #[test]
    fn unreachable_is_distinct_from_http_error() {
        let transport = MockTransport::default().route(
            Method::Get,
            "beta/blobstores",
            vec![Response::unreachable("connection refused")],
        );
        let result = reconcile(&transport, &blobstore_desired(), ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Failed);
        assert!(matches!(
            result.error,
            Some(ReconcileError::TransportUnreachable { .. })
        ));

        let transport = MockTransport::default().route(
            Method::Get,
            "beta/blobstores",
            vec![Response::new(500, b"server error".to_vec())],
        );
        let result = reconcile(&transport, &blobstore_desired(), ReconcileOptions::default());
        assert!(matches!(
            result.error,
            Some(ReconcileError::Http { status: 500, .. })
        ));
    }

    #[test]
    fn create_failure_carries_status_and_body() {
        let transport = MockTransport::default()
            .route(Method::Get, "beta/blobstores", vec![json_response(200, json!([]))])
            .route(
                Method::Post,
                "beta/blobstores/file",
                vec![Response::new(400, br#"{"message":"quota too small"}"#.to_vec())],
            );
        let result = reconcile(&transport, &blobstore_desired(), ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Failed);
        let Some(ReconcileError::Http { status, body }) = result.error else {
            panic!("expected an HTTP error");
        };
        assert_eq!(status, 400);
        assert!(body.contains("quota too small"));
        // No retry: exactly one POST.
        assert_eq!(transport.mutating_calls().len(), 1);
    }

    #[test]
    fn ensure_absent_on_missing_resource_is_a_noop() {
        let transport = MockTransport::default().route(
            Method::Get,
            "beta/blobstores",
            vec![json_response(200, json!([]))],
        );
        let result = ensure_absent(
            &transport,
            ResourceKind::Blobstore,
            "build-cache",
            &PathParams::new(),
            ReconcileOptions::default(),
        );
        assert_eq!(result.outcome, Outcome::Unchanged);
        assert!(transport.mutating_calls().is_empty());
    }

    #[test]
    fn ensure_absent_deletes_present_resource() {
        let transport = MockTransport::default()
            .route(
                Method::Get,
                "beta/blobstores",
                vec![json_response(200, json!([blobstore_observed()]))],
            )
            .route(
                Method::Delete,
                "beta/blobstores/build-cache",
                vec![Response::new(204, Vec::new())],
            );

        let planned = ensure_absent(
            &transport,
            ResourceKind::Blobstore,
            "build-cache",
            &PathParams::new(),
            ReconcileOptions::dry_run(),
        );
        assert_eq!(planned.outcome, Outcome::WouldChange);
        assert!(transport.mutating_calls().is_empty());

        let applied = ensure_absent(
            &transport,
            ResourceKind::Blobstore,
            "build-cache",
            &PathParams::new(),
            ReconcileOptions::default(),
        );
        assert_eq!(applied.outcome, Outcome::Changed);
        assert_eq!(applied.changes["name"].old, json!("build-cache"));
        assert_eq!(
            transport.mutating_calls(),
            vec![(Method::Delete, "beta/blobstores/build-cache".to_string())]
        );
    }

    #[test]
    fn singleton_delete_is_unsupported() {
        let transport = MockTransport::default().route(
            Method::Get,
            "beta/security/anonymous",
            vec![json_response(
                200,
                json!({"enabled": true, "userId": "anonymous", "realmName": "NexusAuthorizingRealm"}),
            )],
        );
        let result = ensure_absent(
            &transport,
            ResourceKind::AnonymousAccess,
            "anonymous",
            &PathParams::new(),
            ReconcileOptions::default(),
        );
        assert_eq!(result.outcome, Outcome::Failed);
        assert!(matches!(
            result.error,
            Some(ReconcileError::UnsupportedOperation { operation: "delete", .. })
        ));
        assert!(transport.mutating_calls().is_empty());
    }

    #[test]
    fn secret_fields_are_always_reapplied() {
        // The server never echoes the SMTP password, so supplying one always
        // converges; this is the documented exception to idempotence.
        let observed = json!({
            "enabled": true,
            "host": "smtp.example.com",
            "port": 587,
            "fromAddress": "nexus@example.com",
        });
        let transport = MockTransport::default()
            .route(Method::Get, "beta/email", vec![json_response(200, observed)])
            .route(Method::Put, "beta/email", vec![Response::new(204, Vec::new())]);

        let desired = DesiredState::new(
            ResourceKind::EmailConfig,
            "smtp.example.com",
            json!({"host": "smtp.example.com", "password": "hunter2"}),
        );
        let result = reconcile(&transport, &desired, ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Changed);
        assert_eq!(result.changes["password"].new, json!(crate::diff::REDACTED));

        // The wire payload carries the real secret, not the redaction.
        let Some(Payload::Json(body)) = transport.payload_for(Method::Put, "beta/email") else {
            panic!("expected a JSON update payload");
        };
        assert_eq!(body["password"], json!("hunter2"));
    }

    #[test]
    fn realm_set_updates_send_a_bare_ordered_list() {
        let transport = MockTransport::default()
            .route(
                Method::Get,
                "beta/security/realms/active",
                vec![json_response(
                    200,
                    json!(["NexusAuthenticatingRealm", "NexusAuthorizingRealm"]),
                )],
            )
            .route(
                Method::Put,
                "beta/security/realms/active",
                vec![Response::new(204, Vec::new())],
            );

        let desired = DesiredState::new(
            ResourceKind::RealmSet,
            "active",
            json!({"active": ["NexusAuthenticatingRealm", "NexusAuthorizingRealm", "DockerToken"]}),
        );
        let result = reconcile(&transport, &desired, ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Changed);

        let Some(Payload::Json(body)) =
            transport.payload_for(Method::Put, "beta/security/realms/active")
        else {
            panic!("expected a JSON update payload");
        };
        assert_eq!(
            body,
            json!(["NexusAuthenticatingRealm", "NexusAuthorizingRealm", "DockerToken"])
        );
    }

    #[test]
    fn user_updates_never_carry_a_password() {
        let observed = json!({
            "userId": "deploy",
            "firstName": "Deploy",
            "lastName": "Bot",
            "emailAddress": "deploy@example.com",
            "status": "active",
            "roles": ["nx-anonymous"],
        });
        let transport = MockTransport::default()
            .route(
                Method::Get,
                "beta/security/users",
                vec![json_response(200, json!([observed]))],
            )
            .route(
                Method::Put,
                "beta/security/users/deploy",
                vec![Response::new(204, Vec::new())],
            );

        let desired = DesiredState::new(
            ResourceKind::User,
            "deploy",
            json!({"userId": "deploy", "roles": ["nx-admin"], "password": "s3cret"}),
        );
        let result = reconcile(&transport, &desired, ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Changed);

        let Some(Payload::Json(body)) =
            transport.payload_for(Method::Put, "beta/security/users/deploy")
        else {
            panic!("expected a JSON update payload");
        };
        assert!(body.get("password").is_none());
        assert_eq!(body["roles"], json!(["nx-admin"]));
    }

    #[test]
    fn proxy_credential_rotation_sends_username_and_password() {
        let observed = json!({
            "name": "maven-central",
            "format": "maven2",
            "type": "proxy",
            "online": true,
            "storage": {"blobStoreName": "default", "strictContentTypeValidation": true},
            "proxy": {"remoteUrl": "https://repo1.maven.org/maven2/", "contentMaxAge": -1, "metadataMaxAge": 1440},
            "httpClient": {"blocked": false, "autoBlock": true,
                           "authentication": {"type": "username", "username": "old-reader"}},
        });
        let transport = MockTransport::default()
            .route(
                Method::Get,
                "beta/repositories",
                vec![json_response(200, json!([observed]))],
            )
            .route(
                Method::Put,
                "beta/repositories/maven/proxy/maven-central",
                vec![Response::new(204, Vec::new())],
            );

        let desired = DesiredState::new(
            ResourceKind::Repository,
            "maven-central",
            json!({
                "name": "maven-central",
                "format": "maven2",
                "type": "proxy",
                "httpClient": {"authentication": {"username": "new-reader", "password": "s3cret"}},
            }),
        )
        .with_param("format", "maven")
        .with_param("type", "proxy");

        let result = reconcile(&transport, &desired, ReconcileOptions::default());
        assert_eq!(result.outcome, Outcome::Changed);
        assert_eq!(
            result.changes["httpClient.authentication.username"].old,
            json!("old-reader")
        );
        assert_eq!(
            result.changes["httpClient.authentication.password"].new,
            json!(crate::diff::REDACTED)
        );

        // Both credential halves land on the wire, merged onto the full body.
        let Some(Payload::Json(body)) =
            transport.payload_for(Method::Put, "beta/repositories/maven/proxy/maven-central")
        else {
            panic!("expected a JSON update payload");
        };
        assert_eq!(body["httpClient"]["authentication"]["username"], json!("new-reader"));
        assert_eq!(body["httpClient"]["authentication"]["password"], json!("s3cret"));
        assert_eq!(body["proxy"]["remoteUrl"], json!("https://repo1.maven.org/maven2/"));
    }

    #[test]
    fn describe_404_means_absent_for_get_strategy() {
        let transport = MockTransport::default();
        let desc = descriptor(ResourceKind::Privilege);
        let observed = observe(&transport, desc, "nx-test", &PathParams::new()).unwrap();
        assert_eq!(observed, ObservedState::Absent);
    }
}
