//! # Reconcile
//!
//! A small engine for desired-state reconciliation over a REST transport.
//!
//! This crate provides the core abstractions for declaring the desired state
//! of a server-side resource, observing its current state through an HTTP
//! API, and converging the two with at most one mutating call per pass.
//!
//! ## Core Concepts
//!
//! - **ResourceKind / Descriptor**: static metadata per resource kind - API
//!   paths, diffable fields, immutability and secrecy rules
//! - **DesiredState**: the caller-declared target for one resource instance
//! - **ChangeSet**: field-level differences between desired and observed
//! - **ReconcileResult**: the structured outcome (unchanged, would_change,
//!   changed, failed) - errors are data, never panics
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{
//!     DesiredState, Method, Payload, ReconcileOptions, Response, ResourceKind,
//!     Transport, reconcile,
//! };
//! use serde_json::json;
//!
//! struct Client { /* HTTP agent, base URL, credentials */ }
//!
//! impl Transport for Client {
//!     fn request(&self, method: Method, path: &str, payload: Option<&Payload>) -> Response {
//!         // one authenticated HTTP call; -1 on transport failure
//!         Response::unreachable("not wired up in this example")
//!     }
//! }
//!
//! let desired = DesiredState::new(
//!     ResourceKind::Blobstore,
//!     "build-cache",
//!     json!({
//!         "name": "build-cache",
//!         "type": "File",
//!         "path": "/nexus-data/blobs/build-cache",
//!         "softQuota": {"type": "spaceRemainingQuota", "limit": 5000000},
//!     }),
//! )
//! .with_param("store_type", "file");
//!
//! let result = reconcile(&Client {}, &desired, ReconcileOptions::dry_run());
//! println!("{:?}: {} field(s) differ", result.outcome, result.changes.len());
//! ```
//!
//! ## Guarantees
//!
//! - Dry-run passes never issue a mutating call and compute the same change
//!   set a live pass would apply.
//! - Immutable-field violations fail before any mutating call, identically
//!   under dry-run and live execution.
//! - Secret fields the server does not echo are always re-applied when
//!   supplied; this is the one documented exception to idempotence.
//! - Transport failure (status `-1`) is distinct from every HTTP error.

pub mod descriptor;
pub mod diff;
pub mod engine;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use descriptor::{
    Describe, Descriptor, Endpoint, PathParams, ResourceKind, descriptor, render_path,
};
pub use diff::REDACTED;
pub use engine::{DesiredState, ObservedState, ensure_absent, observe, reconcile};
pub use error::{ReconcileError, Result};
pub use transport::{Method, Payload, Response, STATUS_UNREACHABLE, Transport};
pub use types::{ChangeSet, FieldChange, Outcome, ReconcileOptions, ReconcileResult};
