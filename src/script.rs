//! Script API client.
//!
//! Groovy scripts cover the administrative surface the REST API does not.
//! Upload goes through POST for a new script and PUT for an existing one;
//! identical content short-circuits to no upload at all. Run arguments are
//! serialized to a JSON string and posted as text/plain, which is the
//! content type the run endpoint insists on.

use reconcile::{Method, Payload, ReconcileError, Response, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const SCRIPT_API: &str = "v1/script";
const SCRIPT_TYPE: &str = "groovy";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub name: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub script_type: String,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Created,
    Updated,
    Unchanged,
}

pub struct ScriptClient<'a> {
    transport: &'a dyn Transport,
}

impl<'a> ScriptClient<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        ScriptClient { transport }
    }

    fn script_path(name: &str) -> String {
        format!("{SCRIPT_API}/{name}")
    }

    pub fn get(&self, name: &str) -> reconcile::Result<Option<ScriptRecord>> {
        let response = self
            .transport
            .request(Method::Get, &Self::script_path(name), None);
        match response.status {
            200 => {
                let record = serde_json::from_slice(&response.body)
                    .map_err(|e| ReconcileError::InvalidBody(e.to_string()))?;
                Ok(Some(record))
            }
            404 => Ok(None),
            _ => Err(status_error(&response)),
        }
    }

    pub fn list(&self) -> reconcile::Result<Vec<ScriptRecord>> {
        let response = self.transport.request(Method::Get, SCRIPT_API, None);
        match response.status {
            200 => serde_json::from_slice(&response.body)
                .map_err(|e| ReconcileError::InvalidBody(e.to_string())),
            _ => Err(status_error(&response)),
        }
    }

    /// Upsert a script, skipping the upload when the stored content already
    /// matches.
    pub fn upload(&self, name: &str, content: &str) -> reconcile::Result<UploadOutcome> {
        let body = json!({
            "name": name,
            "content": content,
            "type": SCRIPT_TYPE,
        });
        let payload = Payload::Json(body);
        match self.get(name)? {
            Some(existing) if existing.content == content => Ok(UploadOutcome::Unchanged),
            Some(_) => {
                log::debug!("updating script {name}");
                let response = self.transport.request(
                    Method::Put,
                    &Self::script_path(name),
                    Some(&payload),
                );
                expect_status(&response, 204)?;
                Ok(UploadOutcome::Updated)
            }
            None => {
                log::debug!("uploading script {name}");
                let response = self
                    .transport
                    .request(Method::Post, SCRIPT_API, Some(&payload));
                expect_status(&response, 204)?;
                Ok(UploadOutcome::Created)
            }
        }
    }

    /// Run a stored script. A `null` result from the API is a success.
    pub fn run(&self, name: &str, args: &Value) -> reconcile::Result<Value> {
        let path = format!("{}/run", Self::script_path(name));
        let payload = Payload::Text(args.to_string());
        let response = self.transport.request(Method::Post, &path, Some(&payload));
        expect_status(&response, 200)?;
        response
            .body_json()
            .map_err(|e| ReconcileError::InvalidBody(e.to_string()))
    }

    /// Delete a script. Returns false when it was not there to begin with.
    pub fn delete(&self, name: &str) -> reconcile::Result<bool> {
        if self.get(name)?.is_none() {
            return Ok(false);
        }
        let response = self
            .transport
            .request(Method::Delete, &Self::script_path(name), None);
        expect_status(&response, 204)?;
        Ok(true)
    }

    /// Upload-then-run: the one-shot path the base-url and task helpers use.
    pub fn execute(&self, name: &str, content: &str, args: &Value) -> reconcile::Result<Value> {
        self.upload(name, content)?;
        self.run(name, args)
    }
}

fn status_error(response: &Response) -> ReconcileError {
    if response.is_reachable() {
        ReconcileError::Http {
            status: response.status,
            body: response.body_str(),
        }
    } else {
        ReconcileError::TransportUnreachable {
            message: response.body_str(),
        }
    }
}

fn expect_status(response: &Response, expected: i32) -> reconcile::Result<()> {
    if response.status == expected {
        Ok(())
    } else {
        Err(status_error(response))
    }
}
