//! SMTP configuration: a singleton whose absent form is the server's
//! built-in reset endpoint rather than a true delete.

use super::{Ensure, Resource};
use reconcile::{DesiredState, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSpec {
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    /// Never echoed by the server; re-applied whenever supplied.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_from")]
    pub from_address: String,
    #[serde(default)]
    pub subject_prefix: String,
    #[serde(default)]
    pub starttls_enabled: bool,
    #[serde(default)]
    pub starttls_required: bool,
    #[serde(default)]
    pub ssl_on_connect: bool,
    #[serde(default)]
    pub ssl_check_identity: bool,
    #[serde(default)]
    pub use_truststore: bool,
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    25
}

fn default_from() -> String {
    "nexus@example.org".into()
}

impl Resource for EmailSpec {
    fn label(&self) -> &'static str {
        "email"
    }

    fn id(&self) -> String {
        self.host.clone()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::EmailConfig
    }

    fn ensure(&self) -> Ensure {
        self.ensure
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        let fields = json!({
            "enabled": self.enabled,
            "host": self.host,
            "port": self.port,
            "username": self.username,
            "password": self.password,
            "fromAddress": self.from_address,
            "subjectPrefix": self.subject_prefix,
            "startTlsEnabled": self.starttls_enabled,
            "startTlsRequired": self.starttls_required,
            "sslOnConnectEnabled": self.ssl_on_connect,
            "sslServerIdentityCheckEnabled": self.ssl_check_identity,
            "nexusTrustStoreEnabled": self.use_truststore,
        });
        let mut desired = DesiredState::new(ResourceKind::EmailConfig, &self.host, fields);
        if self.password.is_none() {
            // Absent means "leave alone", not "clear"; drop the null.
            if let Some(obj) = desired.fields.as_object_mut() {
                obj.remove("password");
            }
        }
        Ok(desired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> EmailSpec {
        EmailSpec {
            ensure: Ensure::Present,
            enabled: true,
            host: "smtp.example.com".into(),
            port: 587,
            username: "nexus".into(),
            password: None,
            from_address: "nexus@example.com".into(),
            subject_prefix: "[nexus]".into(),
            starttls_enabled: true,
            starttls_required: false,
            ssl_on_connect: false,
            ssl_check_identity: false,
            use_truststore: false,
        }
    }

    #[test]
    fn omitted_password_is_not_sent_as_null() {
        let desired = spec().desired().unwrap();
        assert_eq!(desired.fields.get("password"), None);
        assert_eq!(desired.fields["startTlsEnabled"], true);
    }

    #[test]
    fn supplied_password_rides_along() {
        let mut email = spec();
        email.password = Some("hunter2".into());
        let desired = email.desired().unwrap();
        assert_eq!(desired.fields["password"], "hunter2");
    }
}
