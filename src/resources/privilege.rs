//! Privilege specs.
//!
//! The privilege type selects both the endpoint path segment and which fields
//! the payload must carry; mixing them up earns a 400 from the server, so the
//! per-type requirements are validated up front.

use super::{Ensure, Resource};
use reconcile::{DesiredState, ReconcileError, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrivilegeType {
    Application,
    RepositoryAdmin,
    RepositoryView,
    RepositoryContentSelector,
    Script,
    Wildcard,
}

impl PrivilegeType {
    /// Path segment and describe-reported type name; the server uses the same
    /// kebab-case token for both.
    pub fn wire_name(self) -> &'static str {
        match self {
            PrivilegeType::Application => "application",
            PrivilegeType::RepositoryAdmin => "repository-admin",
            PrivilegeType::RepositoryView => "repository-view",
            PrivilegeType::RepositoryContentSelector => "repository-content-selector",
            PrivilegeType::Script => "script",
            PrivilegeType::Wildcard => "wildcard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeSpec {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(rename = "type")]
    pub privilege_type: PrivilegeType,
    #[serde(default)]
    pub description: String,
    /// BROWSE/READ/EDIT/ADD/DELETE/RUN/ASSOCIATE/DISASSOCIATE/ALL,
    /// case-insensitive in the spec, uppercased on the wire.
    #[serde(default)]
    pub actions: Vec<String>,
    /// Application privileges: the domain the actions apply to.
    #[serde(default)]
    pub domain: Option<String>,
    /// Repository privileges: format the privilege is scoped to, `*` for all.
    #[serde(default)]
    pub format: Option<String>,
    /// Repository privileges: repository name, `*` for all.
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub content_selector: Option<String>,
    #[serde(default)]
    pub script_name: Option<String>,
    /// Wildcard privileges: the permission pattern.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl PrivilegeSpec {
    fn missing(&self, field: &'static str) -> ReconcileError {
        ReconcileError::MissingRequiredField {
            field,
            context: format!(
                "{} privilege `{}`",
                self.privilege_type.wire_name(),
                self.name
            ),
        }
    }

    fn require(&self, value: &Option<String>, field: &'static str) -> reconcile::Result<String> {
        value.clone().ok_or_else(|| self.missing(field))
    }

    fn actions_payload(&self) -> reconcile::Result<Value> {
        if self.actions.is_empty() {
            return Err(self.missing("actions"));
        }
        let actions: Vec<String> = self.actions.iter().map(|a| a.to_uppercase()).collect();
        Ok(json!(actions))
    }
}

impl Resource for PrivilegeSpec {
    fn label(&self) -> &'static str {
        "privilege"
    }

    fn id(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Privilege
    }

    fn ensure(&self) -> Ensure {
        self.ensure
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        let mut fields = json!({
            "name": self.name,
            "type": self.privilege_type.wire_name(),
            "description": self.description,
        });
        let obj = fields
            .as_object_mut()
            .unwrap_or_else(|| unreachable!("constructed as an object"));

        match self.privilege_type {
            PrivilegeType::Application => {
                obj.insert("domain".into(), Value::String(self.require(&self.domain, "domain")?));
                obj.insert("actions".into(), self.actions_payload()?);
            }
            PrivilegeType::RepositoryAdmin | PrivilegeType::RepositoryView => {
                obj.insert("format".into(), Value::String(self.require(&self.format, "format")?));
                obj.insert(
                    "repository".into(),
                    Value::String(self.require(&self.repository, "repository")?),
                );
                obj.insert("actions".into(), self.actions_payload()?);
            }
            PrivilegeType::RepositoryContentSelector => {
                obj.insert(
                    "contentSelector".into(),
                    Value::String(self.require(&self.content_selector, "content_selector")?),
                );
                obj.insert("format".into(), Value::String(self.require(&self.format, "format")?));
                obj.insert(
                    "repository".into(),
                    Value::String(self.require(&self.repository, "repository")?),
                );
                obj.insert("actions".into(), self.actions_payload()?);
            }
            PrivilegeType::Script => {
                obj.insert(
                    "scriptName".into(),
                    Value::String(self.require(&self.script_name, "script_name")?),
                );
                obj.insert("actions".into(), self.actions_payload()?);
            }
            PrivilegeType::Wildcard => {
                obj.insert("pattern".into(), Value::String(self.require(&self.pattern, "pattern")?));
            }
        }

        Ok(DesiredState::new(ResourceKind::Privilege, &self.name, fields)
            .with_param("ptype", self.privilege_type.wire_name()))
    }
}
