//! Format-specific repository attributes.
//!
//! Each struct covers the attribute block one format nests under its own key
//! in the repository payload. Defaults match what the server seeds when the
//! block is omitted in the UI, so a freshly created repository diffs clean.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MavenAttributes {
    #[serde(default = "default_version_policy")]
    pub version_policy: String,
    #[serde(default = "default_layout_policy")]
    pub layout_policy: String,
}

fn default_version_policy() -> String {
    "MIXED".into()
}

fn default_layout_policy() -> String {
    "STRICT".into()
}

impl Default for MavenAttributes {
    fn default() -> Self {
        MavenAttributes {
            version_policy: default_version_policy(),
            layout_policy: default_layout_policy(),
        }
    }
}

impl MavenAttributes {
    pub fn payload(&self) -> Value {
        json!({
            "versionPolicy": self.version_policy.to_uppercase(),
            "layoutPolicy": self.layout_policy.to_uppercase(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YumAttributes {
    #[serde(default)]
    pub repodata_depth: u32,
    #[serde(default = "default_deploy_policy")]
    pub deploy_policy: String,
}

fn default_deploy_policy() -> String {
    "STRICT".into()
}

impl Default for YumAttributes {
    fn default() -> Self {
        YumAttributes {
            repodata_depth: 0,
            deploy_policy: default_deploy_policy(),
        }
    }
}

impl YumAttributes {
    pub fn payload(&self) -> Value {
        json!({
            "repodataDepth": self.repodata_depth,
            "deployPolicy": self.deploy_policy.to_uppercase(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerAttributes {
    #[serde(default)]
    pub v1_enabled: bool,
    #[serde(default = "default_true")]
    pub force_basic_auth: bool,
    #[serde(default)]
    pub http_port: Option<u16>,
    #[serde(default)]
    pub https_port: Option<u16>,
    /// Proxy-only: HUB, REGISTRY, or CUSTOM.
    #[serde(default = "default_index_type")]
    pub index_type: String,
    /// Required when `index_type` is CUSTOM.
    #[serde(default)]
    pub index_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_index_type() -> String {
    "HUB".into()
}

impl Default for DockerAttributes {
    fn default() -> Self {
        DockerAttributes {
            v1_enabled: false,
            force_basic_auth: true,
            http_port: None,
            https_port: None,
            index_type: default_index_type(),
            index_url: None,
        }
    }
}

impl DockerAttributes {
    pub fn payload(&self) -> Value {
        json!({
            "v1Enabled": self.v1_enabled,
            "forceBasicAuth": self.force_basic_auth,
            "httpPort": self.http_port,
            "httpsPort": self.https_port,
        })
    }

    pub fn proxy_payload(&self) -> Value {
        json!({
            "indexType": self.index_type.to_uppercase(),
            "indexUrl": self.index_url,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptAttributes {
    #[serde(default = "default_distribution")]
    pub distribution: String,
    /// Proxy-only: whether the upstream is a flat repository.
    #[serde(default)]
    pub flat: bool,
    /// Hosted-only signing keypair, required for apt hosted repositories.
    #[serde(default)]
    pub gpg_keypair: Option<String>,
    #[serde(default)]
    pub gpg_passphrase: Option<String>,
}

fn default_distribution() -> String {
    "bionic".into()
}

impl Default for AptAttributes {
    fn default() -> Self {
        AptAttributes {
            distribution: default_distribution(),
            flat: false,
            gpg_keypair: None,
            gpg_passphrase: None,
        }
    }
}

impl AptAttributes {
    pub fn hosted_payload(&self) -> Value {
        json!({ "distribution": self.distribution })
    }

    pub fn proxy_payload(&self) -> Value {
        json!({ "distribution": self.distribution, "flat": self.flat })
    }

    pub fn signing_payload(&self) -> Value {
        json!({
            "keypair": self.gpg_keypair,
            "passphrase": self.gpg_passphrase.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BowerAttributes {
    #[serde(default = "default_true")]
    pub rewrite_package_urls: bool,
}

impl Default for BowerAttributes {
    fn default() -> Self {
        BowerAttributes {
            rewrite_package_urls: true,
        }
    }
}

impl BowerAttributes {
    pub fn payload(&self) -> Value {
        json!({ "rewritePackageUrls": self.rewrite_package_urls })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NugetAttributes {
    /// Seconds the proxy caches query results for.
    #[serde(default = "default_query_cache")]
    pub query_cache_max_age: i64,
}

fn default_query_cache() -> i64 {
    3600
}

impl Default for NugetAttributes {
    fn default() -> Self {
        NugetAttributes {
            query_cache_max_age: default_query_cache(),
        }
    }
}

impl NugetAttributes {
    pub fn payload(&self) -> Value {
        json!({ "queryCacheItemMaxAge": self.query_cache_max_age })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maven_policies_are_uppercased() {
        let attrs = MavenAttributes {
            version_policy: "release".into(),
            layout_policy: "permissive".into(),
        };
        let payload = attrs.payload();
        assert_eq!(payload["versionPolicy"], "RELEASE");
        assert_eq!(payload["layoutPolicy"], "PERMISSIVE");
    }

    #[test]
    fn yum_defaults_to_strict_at_depth_zero() {
        let payload = YumAttributes::default().payload();
        assert_eq!(payload["repodataDepth"], 0);
        assert_eq!(payload["deployPolicy"], "STRICT");
    }

    #[test]
    fn docker_proxy_payload_carries_index_settings() {
        let attrs = DockerAttributes {
            index_type: "custom".into(),
            index_url: Some("https://index.example.org".into()),
            ..DockerAttributes::default()
        };
        let payload = attrs.proxy_payload();
        assert_eq!(payload["indexType"], "CUSTOM");
        assert_eq!(payload["indexUrl"], "https://index.example.org");
    }
}
