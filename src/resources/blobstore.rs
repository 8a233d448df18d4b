//! Blobstore specs: file-backed stores with optional soft quotas, and
//! S3-backed stores with a bucket configuration.

use super::{Ensure, Resource};
use reconcile::{DesiredState, ReconcileError, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Minimum quota the server accepts without the UI misrendering it.
const DEFAULT_QUOTA_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    File,
    S3,
}

impl StoreType {
    /// Lowercase path segment for create/update endpoints.
    pub fn path_segment(self) -> &'static str {
        match self {
            StoreType::File => "file",
            StoreType::S3 => "s3",
        }
    }

    /// Capitalized form the server reports on describe.
    pub fn wire_name(self) -> &'static str {
        match self {
            StoreType::File => "File",
            StoreType::S3 => "S3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaType {
    // State files may use either the snake_case token or the camelCase
    // name the server itself reports.
    #[serde(alias = "spaceRemainingQuota")]
    SpaceRemainingQuota,
    #[serde(alias = "spaceUsedQuota")]
    SpaceUsedQuota,
}

impl QuotaType {
    fn wire_name(self) -> &'static str {
        match self {
            QuotaType::SpaceRemainingQuota => "spaceRemainingQuota",
            QuotaType::SpaceUsedQuota => "spaceUsedQuota",
        }
    }
}

/// S3 bucket settings. Credentials are optional; IAM-role deployments omit
/// them entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Settings {
    pub bucket: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub expiration_days: Option<i64>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobstoreSpec {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(default)]
    pub store_type: StoreType,
    /// Filesystem path for file stores. Defaults to the server-side
    /// convention of `/nexus-data/blobs/<name>`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub quota_type: Option<QuotaType>,
    #[serde(default)]
    pub quota_limit: Option<u64>,
    #[serde(default)]
    pub s3: Option<S3Settings>,
}

impl BlobstoreSpec {
    fn default_path(&self) -> String {
        format!("/nexus-data/blobs/{}", self.name)
    }
}

impl Resource for BlobstoreSpec {
    fn label(&self) -> &'static str {
        "blobstore"
    }

    fn id(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Blobstore
    }

    fn ensure(&self) -> Ensure {
        self.ensure
    }

    fn desired(&self) -> reconcile::Result<DesiredState> {
        let mut fields = json!({
            "name": self.name,
            "type": self.store_type.wire_name(),
        });
        let obj = as_object(&mut fields);

        match self.store_type {
            StoreType::File => {
                let path = self.path.clone().unwrap_or_else(|| self.default_path());
                obj.insert("path".into(), Value::String(path));
            }
            StoreType::S3 => {
                let s3 = self
                    .s3
                    .as_ref()
                    .ok_or_else(|| ReconcileError::MissingRequiredField {
                        field: "s3",
                        context: format!("S3 blobstore `{}`", self.name),
                    })?;
                if s3.bucket.is_empty() {
                    return Err(ReconcileError::MissingRequiredField {
                        field: "s3.bucket",
                        context: format!("S3 blobstore `{}`", self.name),
                    });
                }
                obj.insert("bucketConfiguration".into(), bucket_configuration(s3));
            }
        }

        if let Some(quota_type) = self.quota_type {
            let limit = self.quota_limit.unwrap_or(DEFAULT_QUOTA_LIMIT);
            obj.insert(
                "softQuota".into(),
                json!({ "type": quota_type.wire_name(), "limit": limit }),
            );
        }

        Ok(DesiredState::new(ResourceKind::Blobstore, &self.name, fields)
            .with_param("store_type", self.store_type.path_segment()))
    }
}

fn bucket_configuration(s3: &S3Settings) -> Value {
    let mut bucket = json!({ "name": s3.bucket });
    if let Some(region) = &s3.region {
        as_object(&mut bucket).insert("region".into(), Value::String(region.clone()));
    }
    if let Some(days) = s3.expiration_days {
        as_object(&mut bucket).insert("expiration".into(), json!(days));
    }
    let mut config = json!({ "bucket": bucket });
    if let Some(key_id) = &s3.access_key_id {
        as_object(&mut config).insert(
            "bucketSecurity".into(),
            json!({
                "accessKeyId": key_id,
                "secretAccessKey": s3.secret_access_key.clone().unwrap_or_default(),
            }),
        );
    }
    config
}

fn as_object(value: &mut Value) -> &mut serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("constructed as an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_spec(name: &str) -> BlobstoreSpec {
        BlobstoreSpec {
            name: name.into(),
            ensure: Ensure::Present,
            store_type: StoreType::File,
            path: None,
            quota_type: None,
            quota_limit: None,
            s3: None,
        }
    }

    #[test]
    fn file_store_defaults_path_under_nexus_data() {
        let desired = file_spec("raw-artifacts").desired().unwrap();
        assert_eq!(desired.fields["path"], "/nexus-data/blobs/raw-artifacts");
        assert_eq!(desired.fields["type"], "File");
        assert_eq!(desired.params.get("store_type"), Some(&"file".to_string()));
    }

    #[test]
    fn quota_type_without_limit_falls_back_to_one_megabyte() {
        let mut spec = file_spec("quota");
        spec.quota_type = Some(QuotaType::SpaceRemainingQuota);
        let desired = spec.desired().unwrap();
        assert_eq!(desired.fields["softQuota"]["type"], "spaceRemainingQuota");
        assert_eq!(desired.fields["softQuota"]["limit"], 1_000_000);
    }

    #[test]
    fn quota_type_accepts_server_spelling() {
        for token in ["\"space_used_quota\"", "\"spaceUsedQuota\""] {
            let parsed: QuotaType = serde_json::from_str(token).unwrap();
            assert_eq!(parsed, QuotaType::SpaceUsedQuota);
        }
        let parsed: QuotaType = serde_json::from_str("\"spaceRemainingQuota\"").unwrap();
        assert_eq!(parsed, QuotaType::SpaceRemainingQuota);
    }

    #[test]
    fn s3_store_requires_bucket_settings() {
        let mut spec = file_spec("remote");
        spec.store_type = StoreType::S3;
        let err = spec.desired().unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::MissingRequiredField { field: "s3", .. }
        ));
    }

    #[test]
    fn s3_store_builds_bucket_configuration() {
        let mut spec = file_spec("remote");
        spec.store_type = StoreType::S3;
        spec.s3 = Some(S3Settings {
            bucket: "artifacts".into(),
            region: Some("us-east-1".into()),
            access_key_id: Some("AKIA123".into()),
            secret_access_key: Some("shh".into()),
            expiration_days: None,
        });
        let desired = spec.desired().unwrap();
        let config = &desired.fields["bucketConfiguration"];
        assert_eq!(config["bucket"]["name"], "artifacts");
        assert_eq!(config["bucket"]["region"], "us-east-1");
        assert_eq!(config["bucketSecurity"]["secretAccessKey"], "shh");
        assert_eq!(desired.fields.get("path"), None);
    }
}
