//! Per-resource adapters.
//!
//! Each module translates the ergonomic spec fields a state file declares
//! into the wire payload the server expects, validates format-conditional
//! required fields before any network call, and normalizes values the server
//! is case-sensitive about.

pub mod anonymous;
pub mod blobstore;
pub mod email;
pub mod formats;
pub mod privilege;
pub mod realm;
pub mod repository;
pub mod role;
pub mod user;

pub use anonymous::AnonymousSpec;
pub use blobstore::BlobstoreSpec;
pub use email::EmailSpec;
pub use privilege::PrivilegeSpec;
pub use realm::RealmSpec;
pub use repository::RepositorySpec;
pub use role::RoleSpec;
pub use user::UserSpec;

use crate::state::StateOutcome;
use reconcile::{
    ChangeSet, DesiredState, PathParams, ReconcileOptions, ReconcileResult, ResourceKind,
    Transport, ensure_absent, reconcile,
};
use serde::{Deserialize, Serialize};

/// Whether a declared resource should exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

/// A declared resource: something the server can hold, converged towards the
/// spec the state file carries.
pub trait Resource {
    /// Human-facing label ("blobstore", "repository", ...).
    fn label(&self) -> &'static str;

    /// Identity of this instance (name, userId, role id).
    fn id(&self) -> String;

    /// The engine kind this resource reconciles as.
    fn kind(&self) -> ResourceKind;

    /// Whether the resource should exist.
    fn ensure(&self) -> Ensure {
        Ensure::Present
    }

    /// Build the desired state for the engine. Validation failures surface
    /// here, before any network call.
    fn desired(&self) -> reconcile::Result<DesiredState>;

    /// Converge this resource and report the outcome in the host-engine
    /// result shape.
    fn apply(&self, transport: &dyn Transport, opts: ReconcileOptions) -> StateOutcome {
        apply_standard(self, transport, opts)
    }
}

/// The standard converge path: ensure-absent issues at most one DELETE,
/// ensure-present runs the full reconcile.
pub fn apply_standard<R: Resource + ?Sized>(
    resource: &R,
    transport: &dyn Transport,
    opts: ReconcileOptions,
) -> StateOutcome {
    let result = match resource.ensure() {
        Ensure::Absent => ensure_absent(
            &transport,
            resource.kind(),
            &resource.id(),
            &PathParams::new(),
            opts,
        ),
        Ensure::Present => match resource.desired() {
            Ok(desired) => reconcile(&transport, &desired, opts),
            Err(err) => ReconcileResult::failed(ChangeSet::new(), err),
        },
    };
    StateOutcome::from_result(resource.label(), &resource.id(), result)
}
