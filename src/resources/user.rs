//! User specs.
//!
//! Passwords only travel on the create payload; for an existing user the
//! server exposes a dedicated change-password endpoint instead, so re-applying
//! a password is opt-in via `update_password`.

use super::{Ensure, Resource, apply_standard};
use crate::state::StateOutcome;
use reconcile::{
    DesiredState, Method, Payload, REDACTED, ReconcileError, ReconcileOptions, ResourceKind,
    Transport,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSpec {
    /// The userId, also used as the display identity.
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(default)]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default = "default_status")]
    pub status: String,
    /// Push the password through the change-password endpoint even when the
    /// user already exists.
    #[serde(default)]
    pub update_password: bool,
}

fn default_roles() -> Vec<String> {
    vec!["nx-anonymous".to_string()]
}

fn default_status() -> String {
    "active".into()
}

impl Resource for UserSpec {
    fn label(&self) -> &'static str {
        "user"
    }

    fn id(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::User
    }

    fn ensure(&self) -> Ensure {
        self.ensure
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        if self.ensure == Ensure::Present && self.password.is_none() {
            return Err(ReconcileError::MissingRequiredField {
                field: "password",
                context: format!("user `{}`", self.name),
            });
        }
        let fields = json!({
            "userId": self.name,
            "password": self.password,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "emailAddress": self.email,
            "status": self.status,
            "roles": self.roles,
        });
        Ok(DesiredState::new(ResourceKind::User, &self.name, fields))
    }

    fn apply(&self, transport: &dyn Transport, opts: ReconcileOptions) -> StateOutcome {
        let mut outcome = apply_standard(self, transport, opts);
        if !self.update_password || self.ensure == Ensure::Absent {
            return outcome;
        }
        let Some(password) = &self.password else {
            return outcome;
        };
        if outcome.result == Some(false) {
            return outcome;
        }
        // A fresh create already carried the password in its payload.
        if outcome.changes.contains_key("userId") {
            return outcome;
        }
        if opts.dry_run {
            outcome.note_would_change("password", Value::String(REDACTED.into()));
            return outcome;
        }
        let path = format!("beta/security/users/{}/change-password", self.name);
        let payload = Payload::Text(password.clone());
        let response = transport.request(Method::Put, &path, Some(&payload));
        if matches!(response.status, 204) {
            outcome.note_changed("password", Value::String(REDACTED.into()));
        } else {
            outcome.fail(
                format!("failed to change password for user `{}`", self.name),
                response.status,
                response.body_str(),
            );
        }
        outcome
    }
}
