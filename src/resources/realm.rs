//! The active realm set: one ordered list, reconciled as a single resource.

use super::{Ensure, Resource};
use reconcile::{DesiredState, ReconcileError, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Realm order the server ships with.
pub const DEFAULT_REALMS: &[&str] = &["NexusAuthenticatingRealm", "NexusAuthorizingRealm"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmSpec {
    /// Active realm ids in authentication order.
    pub active: Vec<String>,
}

impl RealmSpec {
    /// The stock server configuration, used by the reset path.
    pub fn stock() -> Self {
        RealmSpec {
            active: DEFAULT_REALMS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Resource for RealmSpec {
    fn label(&self) -> &'static str {
        "realms"
    }

    fn id(&self) -> String {
        "active".into()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::RealmSet
    }

    fn ensure(&self) -> Ensure {
        Ensure::Present
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        if self.active.is_empty() {
            return Err(ReconcileError::MissingRequiredField {
                field: "active",
                context: "realm set".into(),
            });
        }
        let fields = json!({ "active": self.active });
        Ok(DesiredState::new(ResourceKind::RealmSet, "active", fields))
    }
}
