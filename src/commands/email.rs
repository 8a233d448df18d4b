//! Send a verification email through the configured SMTP settings.

use crate::ui;
use anyhow::Result;
use reconcile::{Method, Payload, Transport};

pub fn verify(transport: &dyn Transport, to: &str) -> Result<()> {
    let payload = Payload::Text(to.to_string());
    let response = transport.request(Method::Post, "beta/email/verify", Some(&payload));
    match response.status {
        200 => {
            let success = response
                .body_json()
                .ok()
                .and_then(|v| v.get("success").and_then(|s| s.as_bool()))
                .unwrap_or(false);
            if success {
                ui::success(&format!("verification email sent to {to}"));
                Ok(())
            } else {
                anyhow::bail!("server could not deliver the verification email to {to}")
            }
        }
        -1 => anyhow::bail!("server unreachable: {}", response.body_str()),
        status => anyhow::bail!("verification failed with status {status}"),
    }
}
