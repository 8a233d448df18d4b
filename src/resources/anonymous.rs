//! Anonymous access settings: a singleton toggle with its backing user and
//! realm.

use super::{Ensure, Resource};
use reconcile::{DesiredState, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymousSpec {
    pub enabled: bool,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_realm")]
    pub realm: String,
}

fn default_user() -> String {
    "anonymous".into()
}

fn default_realm() -> String {
    "NexusAuthorizingRealm".into()
}

impl Resource for AnonymousSpec {
    fn label(&self) -> &'static str {
        "anonymous"
    }

    fn id(&self) -> String {
        self.user.clone()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::AnonymousAccess
    }

    fn ensure(&self) -> Ensure {
        Ensure::Present
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        let fields = json!({
            "enabled": self.enabled,
            "userId": self.user,
            "realmName": self.realm,
        });
        Ok(DesiredState::new(
            ResourceKind::AnonymousAccess,
            &self.user,
            fields,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_stock_server() {
        let parsed: AnonymousSpec = serde_json::from_str("{\"enabled\": false}").unwrap();
        let desired = parsed.desired().unwrap();
        assert_eq!(desired.fields["userId"], "anonymous");
        assert_eq!(desired.fields["realmName"], "NexusAuthorizingRealm");
        assert_eq!(desired.fields["enabled"], false);
    }
}
