//! Role specs: a role id with granted privileges and nested roles.

use super::{Ensure, Resource};
use reconcile::{DesiredState, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Role id, also used as the display name unless one is given.
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privileges: Vec<String>,
    /// Ids of roles this role contains.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Resource for RoleSpec {
    fn label(&self) -> &'static str {
        "role"
    }

    fn id(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Role
    }

    fn ensure(&self) -> Ensure {
        self.ensure
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        let display = self.display_name.clone().unwrap_or_else(|| self.name.clone());
        let fields = json!({
            "id": self.name,
            "name": display,
            "description": self.description,
            "privileges": self.privileges,
            "roles": self.roles,
        });
        Ok(DesiredState::new(ResourceKind::Role, &self.name, fields))
    }
}
