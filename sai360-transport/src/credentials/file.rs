use std::path::PathBuf;

use async_trait::async_trait;
use sai360_core::{CredentialKind, CredentialSet, OAuth2Credentials, SessionCredentials};
use serde::Deserialize;

use super::{CredentialError, CredentialStore};
use crate::config::{parse_str, read_file, ConfigFormat};

/// On-disk layout, JSON or YAML:
///
/// ```yaml
/// basic:
///   baseUrl: https://customer.sai360.net/bwise
///   username: svc-automation
///   password: ...
/// oauth2:
///   baseUrl: https://customer.sai360.net/bwise
///   clientId: ...
///   clientSecret: ...
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsFile {
    #[serde(default, alias = "sai360GrcBasicApi", alias = "session")]
    pub basic: Option<SessionCredentials>,
    #[serde(default, alias = "sai360GrcOAuth2Api")]
    pub oauth2: Option<OAuth2Credentials>,
}

/// Re-reads the file on every lookup so rotated credentials are picked up.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    pub path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<CredentialsFile, CredentialError> {
        let content = read_file(&self.path)?;
        Ok(parse_str(&content, ConfigFormat::Auto)?)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, kind: CredentialKind) -> Result<Option<CredentialSet>, CredentialError> {
        let file = self.read()?;
        Ok(match kind {
            CredentialKind::Session => file.basic.map(CredentialSet::Session),
            CredentialKind::OAuth2 => file.oauth2.map(CredentialSet::OAuth2),
        })
    }
}
