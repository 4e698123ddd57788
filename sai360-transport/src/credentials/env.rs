use async_trait::async_trait;
use sai360_core::{CredentialKind, CredentialSet, OAuth2Credentials, SessionCredentials};

use super::{CredentialError, CredentialStore};

/// Reads credentials from `{prefix}BASE_URL`, `{prefix}USERNAME`, `{prefix}PASSWORD`
/// (session) and `{prefix}CLIENT_ID`, `{prefix}CLIENT_SECRET`, `{prefix}OAUTH2_BASE_URL`,
/// `{prefix}AUTH_URL`, `{prefix}ACCESS_TOKEN_URL`, `{prefix}SCOPE` (OAuth2).
///
/// A kind counts as configured once its identifying variable (`USERNAME` or
/// `CLIENT_ID`) is set.
#[derive(Debug, Clone)]
pub struct EnvCredentialStore {
    pub prefix: String,
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self {
            prefix: "SAI360_".to_string(),
        }
    }
}

impl EnvCredentialStore {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(format!("{}{name}", self.prefix))
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    fn require(&self, kind: CredentialKind, name: &str) -> Result<String, CredentialError> {
        self.var(name).ok_or_else(|| {
            CredentialError::incomplete(kind, format!("{}{name} is not set", self.prefix))
        })
    }

    fn session(&self) -> Result<Option<SessionCredentials>, CredentialError> {
        let Some(username) = self.var("USERNAME") else {
            return Ok(None);
        };
        let kind = CredentialKind::Session;
        Ok(Some(SessionCredentials::new(
            self.require(kind, "BASE_URL")?,
            username,
            self.require(kind, "PASSWORD")?,
        )))
    }

    fn oauth2(&self) -> Result<Option<OAuth2Credentials>, CredentialError> {
        let Some(client_id) = self.var("CLIENT_ID") else {
            return Ok(None);
        };
        let kind = CredentialKind::OAuth2;
        let base_url = match self.var("OAUTH2_BASE_URL") {
            Some(url) => url,
            None => self.require(kind, "BASE_URL")?,
        };
        let mut creds =
            OAuth2Credentials::new(base_url, client_id, self.require(kind, "CLIENT_SECRET")?);
        creds.auth_url = self.var("AUTH_URL");
        creds.access_token_url = self.var("ACCESS_TOKEN_URL");
        if let Some(scope) = self.var("SCOPE") {
            creds.scope = scope;
        }
        Ok(Some(creds))
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn get(&self, kind: CredentialKind) -> Result<Option<CredentialSet>, CredentialError> {
        match kind {
            CredentialKind::Session => Ok(self.session()?.map(CredentialSet::Session)),
            CredentialKind::OAuth2 => Ok(self.oauth2()?.map(CredentialSet::OAuth2)),
        }
    }
}
