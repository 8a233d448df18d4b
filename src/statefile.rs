//! State file loading.
//!
//! A state file is a JSON document declaring the desired inventory: lists of
//! blobstores, repositories, users, roles, and privileges, plus the three
//! singletons (realm order, SMTP settings, anonymous access). Ordering within
//! the file is preserved so dependent resources (a blobstore before the
//! repositories on it, roles before the users holding them) converge first.

use crate::resources::{
    AnonymousSpec, BlobstoreSpec, EmailSpec, PrivilegeSpec, RealmSpec, RepositorySpec, Resource,
    RoleSpec, UserSpec,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub blobstores: Vec<BlobstoreSpec>,
    #[serde(default)]
    pub repositories: Vec<RepositorySpec>,
    #[serde(default)]
    pub roles: Vec<RoleSpec>,
    #[serde(default)]
    pub users: Vec<UserSpec>,
    #[serde(default)]
    pub privileges: Vec<PrivilegeSpec>,
    #[serde(default)]
    pub realms: Option<RealmSpec>,
    #[serde(default)]
    pub email: Option<EmailSpec>,
    #[serde(default)]
    pub anonymous: Option<AnonymousSpec>,
}

impl StateFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse state file {}", path.display()))
    }

    /// Flatten into converge order: infrastructure first, then security,
    /// then the singletons.
    pub fn resources(&self) -> Vec<Box<dyn Resource>> {
        let mut resources: Vec<Box<dyn Resource>> = Vec::new();
        for spec in &self.blobstores {
            resources.push(Box::new(spec.clone()));
        }
        for spec in &self.repositories {
            resources.push(Box::new(spec.clone()));
        }
        for spec in &self.privileges {
            resources.push(Box::new(spec.clone()));
        }
        for spec in &self.roles {
            resources.push(Box::new(spec.clone()));
        }
        for spec in &self.users {
            resources.push(Box::new(spec.clone()));
        }
        if let Some(spec) = &self.realms {
            resources.push(Box::new(spec.clone()));
        }
        if let Some(spec) = &self.email {
            resources.push(Box::new(spec.clone()));
        }
        if let Some(spec) = &self.anonymous {
            resources.push(Box::new(spec.clone()));
        }
        resources
    }

    pub fn is_empty(&self) -> bool {
        self.resources().is_empty()
    }
}
