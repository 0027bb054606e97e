use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gocd_defs::{Credential, CredentialError, CredentialRef};
use log::debug;
use serde::Deserialize;

/// Resolves an opaque credential reference to a username/password pair.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn resolve(&self, reference: &CredentialRef) -> Result<Credential, CredentialError>;
}

/// In-memory store, mainly for hosts that already hold decrypted secrets.
#[derive(Default)]
pub struct StaticCredentialStore {
    credentials: HashMap<CredentialRef, Credential>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, reference: &str, credential: Credential) -> Self {
        self.credentials
            .insert(CredentialRef::new(reference), credential);
        self
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn resolve(&self, reference: &CredentialRef) -> Result<Credential, CredentialError> {
        self.credentials
            .get(reference)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound(reference.to_string()))
    }
}

#[derive(Deserialize)]
struct StoredCredential {
    username: Option<String>,
    password: Option<String>,
}

/// Reads credentials from a YAML (or JSON) file keyed by reference:
///
/// ```yaml
/// gocd-bot:
///   username: bot
///   password: s3cret
/// ```
///
/// The file is read on every lookup so nothing is kept between executions.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileCredentialStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn resolve(&self, reference: &CredentialRef) -> Result<Credential, CredentialError> {
        let inaccessible = |reason: String| CredentialError::Inaccessible(reference.to_string(), reason);

        debug!(
            "Resolving credential {} from {}",
            reference,
            self.path.display()
        );
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| inaccessible(format!("{}: {}", self.path.display(), e)))?;
        let mut stored: HashMap<String, StoredCredential> = serde_yaml::from_str(&contents)
            .map_err(|e| inaccessible(format!("{}: {}", self.path.display(), e)))?;

        let entry = stored
            .remove(reference.as_str())
            .ok_or_else(|| CredentialError::NotFound(reference.to_string()))?;

        match (entry.username, entry.password) {
            (Some(username), Some(password)) => Ok(Credential::new(&username, &password)),
            _ => Err(CredentialError::WrongType(reference.to_string())),
        }
    }
}
