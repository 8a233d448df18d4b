//! Static resource descriptor table.
//!
//! One [`Descriptor`] per resource kind: where to describe it, how to
//! create/update/delete it, which fields are diffable, which are immutable
//! after creation, and which are secrets the server never echoes back.
//! Built once at compile time, never mutated.

use crate::error::{ReconcileError, Result};
use crate::transport::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The resource kinds this engine knows how to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Blobstore,
    Repository,
    User,
    Role,
    Privilege,
    RealmSet,
    EmailConfig,
    AnonymousAccess,
}

impl ResourceKind {
    /// All registered kinds.
    pub const ALL: [Self; 8] = [
        Self::Blobstore,
        Self::Repository,
        Self::User,
        Self::Role,
        Self::Privilege,
        Self::RealmSet,
        Self::EmailConfig,
        Self::AnonymousAccess,
    ];

    /// Stable lowercase name, also accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blobstore => "blobstore",
            Self::Repository => "repository",
            Self::User => "user",
            Self::Role => "role",
            Self::Privilege => "privilege",
            Self::RealmSet => "realm_set",
            Self::EmailConfig => "email_config",
            Self::AnonymousAccess => "anonymous_access",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ReconcileError::UnknownKind(s.to_string()))
    }
}

/// How the current state of a resource is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Describe {
    /// A single-resource (or singleton) GET; 404 means absent.
    Get { path: &'static str },
    /// Only a bulk listing exists; the entry whose `key` field equals the
    /// identity is the resource, and a missing entry means absent.
    ListFilter { path: &'static str, key: &'static str },
}

/// One mutating API endpoint: method, path template, accepted success codes.
///
/// Path templates carry `{id}` plus adapter-supplied parameters such as
/// `{format}`, `{type}`, `{store_type}`, or `{ptype}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    /// Success codes vary per endpoint (200, 201, or 204); anything else is
    /// a failure.
    pub ok: &'static [i32],
}

/// Per-kind reconciliation metadata.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub kind: ResourceKind,
    /// Field holding the resource identity in describe responses.
    pub identity_field: &'static str,
    pub describe: Describe,
    pub create: Endpoint,
    pub update: Endpoint,
    /// Singletons (realm set, anonymous access) cannot be deleted.
    pub delete: Option<Endpoint>,
    /// Dotted field paths eligible for diffing. Fields unset in the desired
    /// record are skipped, never treated as "clear to null".
    pub diff_fields: &'static [&'static str],
    /// Subset of fields that cannot change after creation. Attempting to
    /// change one is a caller error reported before any mutating call.
    pub immutable_fields: &'static [&'static str],
    /// Fields the server never echoes back. Always re-applied when supplied,
    /// redacted in reported change sets.
    pub secret_fields: &'static [&'static str],
    /// Create-body renames: the create endpoint wants a different field name
    /// than describe reports (e.g. blobstore `softQuota.limit` is sent as
    /// `softQuota.size` on create). Recorded explicitly to avoid
    /// false-positive diffs.
    pub create_aliases: &'static [(&'static str, &'static str)],
    /// Fields carried in the desired record only for diffing/immutability
    /// checks, stripped from the create body (the API encodes them in the
    /// path instead).
    pub create_strip: &'static [&'static str],
    /// Fields valid only at creation (e.g. user password); stripped from
    /// update bodies.
    pub create_only: &'static [&'static str],
    /// For kinds whose wire body is a bare JSON array (the realm set), the
    /// field name the array is folded under for diffing, and unwrapped from
    /// on update.
    pub body_field: Option<&'static str>,
}

/// Path parameters supplied by adapters for endpoint templates.
pub type PathParams = BTreeMap<&'static str, String>;

/// Render an endpoint path template, substituting `{id}` and any
/// adapter-supplied parameters.
pub fn render_path(template: &str, identity: &str, params: &PathParams) -> Result<String> {
    let mut path = template.replace("{id}", identity);
    for (key, value) in params {
        path = path.replace(&format!("{{{key}}}"), value);
    }
    if let Some(start) = path.find('{') {
        let end = path[start..].find('}').map_or(path.len(), |e| start + e + 1);
        return Err(ReconcileError::MissingRequiredField {
            field: "path parameter",
            context: format!("endpoint template `{template}` ({})", &path[start..end]),
        });
    }
    Ok(path)
}

/// Look up the descriptor for a kind. Static, infallible for registered
/// kinds; resolve untrusted names with [`ResourceKind::from_str`] first.
pub fn descriptor(kind: ResourceKind) -> &'static Descriptor {
    match kind {
        ResourceKind::Blobstore => &BLOBSTORE,
        ResourceKind::Repository => &REPOSITORY,
        ResourceKind::User => &USER,
        ResourceKind::Role => &ROLE,
        ResourceKind::Privilege => &PRIVILEGE,
        ResourceKind::RealmSet => &REALM_SET,
        ResourceKind::EmailConfig => &EMAIL_CONFIG,
        ResourceKind::AnonymousAccess => &ANONYMOUS_ACCESS,
    }
}

static BLOBSTORE: Descriptor = Descriptor {
    kind: ResourceKind::Blobstore,
    identity_field: "name",
    describe: Describe::ListFilter {
        path: "beta/blobstores",
        key: "name",
    },
    create: Endpoint {
        method: Method::Post,
        path: "beta/blobstores/{store_type}",
        ok: &[204],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/blobstores/{store_type}/{id}",
        ok: &[204],
    },
    delete: Some(Endpoint {
        method: Method::Delete,
        path: "beta/blobstores/{id}",
        ok: &[204],
    }),
    // The bulk listing never echoes `path`, so it cannot participate in the
    // diff; only the quota (and the immutable store type) converge.
    diff_fields: &["type", "softQuota.type", "softQuota.limit"],
    immutable_fields: &["type"],
    secret_fields: &[
        "bucketConfiguration.bucketSecurity.secretAccessKey",
    ],
    create_aliases: &[("softQuota.limit", "softQuota.size")],
    create_strip: &["type"],
    create_only: &[],
    body_field: None,
};

static REPOSITORY: Descriptor = Descriptor {
    kind: ResourceKind::Repository,
    identity_field: "name",
    describe: Describe::ListFilter {
        path: "beta/repositories",
        key: "name",
    },
    create: Endpoint {
        method: Method::Post,
        path: "beta/repositories/{format}/{type}",
        ok: &[201, 204],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/repositories/{format}/{type}/{id}",
        ok: &[204],
    },
    delete: Some(Endpoint {
        method: Method::Delete,
        path: "beta/repositories/{id}",
        ok: &[204],
    }),
    diff_fields: &[
        "format",
        "type",
        "online",
        "storage.blobStoreName",
        "storage.strictContentTypeValidation",
        "storage.writePolicy",
        "cleanup.policyNames",
        "group.memberNames",
        "proxy.remoteUrl",
        "proxy.contentMaxAge",
        "proxy.metadataMaxAge",
        "negativeCache.enabled",
        "negativeCache.timeToLive",
        "httpClient.blocked",
        "httpClient.autoBlock",
        "httpClient.authentication.username",
        "maven.versionPolicy",
        "maven.layoutPolicy",
        "yum.repodataDepth",
        "yum.deployPolicy",
        "docker.v1Enabled",
        "docker.forceBasicAuth",
        "docker.httpPort",
        "docker.httpsPort",
        "dockerProxy.indexType",
        "dockerProxy.indexUrl",
        "apt.distribution",
        "apt.flat",
        "bower.rewritePackageUrls",
        "nugetProxy.queryCacheItemMaxAge",
    ],
    immutable_fields: &["format", "type"],
    secret_fields: &[
        "httpClient.authentication.password",
        "aptSigning.keypair",
        "aptSigning.passphrase",
    ],
    create_aliases: &[],
    create_strip: &["format", "type"],
    create_only: &[],
    body_field: None,
};

static USER: Descriptor = Descriptor {
    kind: ResourceKind::User,
    identity_field: "userId",
    describe: Describe::ListFilter {
        path: "beta/security/users",
        key: "userId",
    },
    create: Endpoint {
        method: Method::Post,
        path: "beta/security/users",
        ok: &[200],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/security/users/{id}",
        ok: &[204],
    },
    delete: Some(Endpoint {
        method: Method::Delete,
        path: "beta/security/users/{id}",
        ok: &[204],
    }),
    diff_fields: &["firstName", "lastName", "emailAddress", "status", "roles"],
    immutable_fields: &[],
    // The change-password endpoint is separate; the create payload is the
    // only REST path that accepts a password.
    secret_fields: &["password"],
    create_aliases: &[],
    create_strip: &[],
    create_only: &["password"],
    body_field: None,
};

static ROLE: Descriptor = Descriptor {
    kind: ResourceKind::Role,
    identity_field: "id",
    describe: Describe::ListFilter {
        path: "beta/security/roles",
        key: "id",
    },
    create: Endpoint {
        method: Method::Post,
        path: "beta/security/roles",
        ok: &[200],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/security/roles/{id}",
        ok: &[204],
    },
    delete: Some(Endpoint {
        method: Method::Delete,
        path: "beta/security/roles/{id}",
        ok: &[204],
    }),
    diff_fields: &["name", "description", "privileges", "roles"],
    immutable_fields: &[],
    secret_fields: &[],
    create_aliases: &[],
    create_strip: &[],
    create_only: &[],
    body_field: None,
};

static PRIVILEGE: Descriptor = Descriptor {
    kind: ResourceKind::Privilege,
    identity_field: "name",
    describe: Describe::Get {
        path: "beta/security/privileges/{id}",
    },
    create: Endpoint {
        method: Method::Post,
        path: "beta/security/privileges/{ptype}",
        ok: &[201],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/security/privileges/{ptype}/{id}",
        ok: &[204],
    },
    delete: Some(Endpoint {
        method: Method::Delete,
        path: "beta/security/privileges/{id}",
        ok: &[204],
    }),
    diff_fields: &[
        "type",
        "description",
        "actions",
        "domain",
        "format",
        "repository",
        "contentSelector",
        "scriptName",
        "pattern",
    ],
    immutable_fields: &["type"],
    secret_fields: &[],
    create_aliases: &[],
    create_strip: &["type"],
    create_only: &[],
    body_field: None,
};

static REALM_SET: Descriptor = Descriptor {
    kind: ResourceKind::RealmSet,
    identity_field: "active",
    describe: Describe::Get {
        path: "beta/security/realms/active",
    },
    create: Endpoint {
        method: Method::Put,
        path: "beta/security/realms/active",
        ok: &[204],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/security/realms/active",
        ok: &[204],
    },
    delete: None,
    // Realm activation order is server-significant: reordering counts as a
    // change even when the set of realms is identical.
    diff_fields: &["active"],
    immutable_fields: &[],
    secret_fields: &[],
    create_aliases: &[],
    create_strip: &[],
    create_only: &[],
    body_field: Some("active"),
};

static EMAIL_CONFIG: Descriptor = Descriptor {
    kind: ResourceKind::EmailConfig,
    identity_field: "host",
    describe: Describe::Get { path: "beta/email" },
    create: Endpoint {
        method: Method::Put,
        path: "beta/email",
        ok: &[204],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/email",
        ok: &[204],
    },
    delete: Some(Endpoint {
        method: Method::Delete,
        path: "beta/email",
        ok: &[204],
    }),
    diff_fields: &[
        "enabled",
        "host",
        "port",
        "username",
        "fromAddress",
        "subjectPrefix",
        "startTlsEnabled",
        "startTlsRequired",
        "sslOnConnectEnabled",
        "sslServerIdentityCheckEnabled",
        "nexusTrustStoreEnabled",
    ],
    immutable_fields: &[],
    secret_fields: &["password"],
    create_aliases: &[],
    create_strip: &[],
    create_only: &[],
    body_field: None,
};

static ANONYMOUS_ACCESS: Descriptor = Descriptor {
    kind: ResourceKind::AnonymousAccess,
    identity_field: "userId",
    describe: Describe::Get {
        path: "beta/security/anonymous",
    },
    create: Endpoint {
        method: Method::Put,
        path: "beta/security/anonymous",
        ok: &[200],
    },
    update: Endpoint {
        method: Method::Put,
        path: "beta/security/anonymous",
        ok: &[200],
    },
    delete: None,
    diff_fields: &["enabled", "userId", "realmName"],
    immutable_fields: &[],
    secret_fields: &[],
    create_aliases: &[],
    create_strip: &[],
    create_only: &[],
    body_field: None,
};

impl Descriptor {
    /// Whether a field path is immutable after creation.
    pub fn is_immutable(&self, field: &str) -> bool {
        self.immutable_fields.contains(&field)
    }

    /// Whether a field path holds a secret the server never echoes.
    pub fn is_secret(&self, field: &str) -> bool {
        self.secret_fields.contains(&field)
    }

    /// The create-body name for a field, honoring the alias table.
    pub fn create_field_name<'a>(&self, field: &'a str) -> &'a str {
        self.create_aliases
            .iter()
            .find(|(describe_name, _)| *describe_name == field)
            .map_or(field, |(_, create_name)| *create_name)
    }
}
