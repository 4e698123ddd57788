use async_trait::async_trait;
use sai360_core::{
    CredentialKind, CredentialSelection, CredentialSet, OAuth2Credentials, SessionCredentials,
};
use tracing::{debug, warn};

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no SAI360 credentials found; set either Basic Auth or OAuth2 credentials")]
    NotConfigured,
    #[error("{kind} credentials are incomplete: {message}")]
    Incomplete {
        kind: CredentialKind,
        message: String,
    },
    #[error(transparent)]
    Source(#[from] ConfigError),
}

impl CredentialError {
    pub fn incomplete(kind: CredentialKind, message: impl Into<String>) -> Self {
        Self::Incomplete {
            kind,
            message: message.into(),
        }
    }
}

/// Resolves named credential sets. `Ok(None)` means the kind is not configured.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, kind: CredentialKind) -> Result<Option<CredentialSet>, CredentialError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    session: Option<SessionCredentials>,
    oauth2: Option<OAuth2Credentials>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, credentials: SessionCredentials) -> Self {
        self.session = Some(credentials);
        self
    }

    pub fn with_oauth2(mut self, credentials: OAuth2Credentials) -> Self {
        self.oauth2 = Some(credentials);
        self
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn get(&self, kind: CredentialKind) -> Result<Option<CredentialSet>, CredentialError> {
        Ok(match kind {
            CredentialKind::Session => self.session.clone().map(CredentialSet::Session),
            CredentialKind::OAuth2 => self.oauth2.clone().map(CredentialSet::OAuth2),
        })
    }
}

/// Picks the credential set for `selection`, probing kinds in order.
///
/// With [`CredentialSelection::Auto`] both kinds are read; when both exist the
/// session set wins and a warning is logged.
pub async fn resolve_credentials(
    store: &dyn CredentialStore,
    selection: CredentialSelection,
) -> Result<CredentialSet, CredentialError> {
    let mut chosen: Option<CredentialSet> = None;
    for kind in selection.candidates() {
        let Some(found) = store.get(*kind).await? else {
            continue;
        };
        match &chosen {
            None => chosen = Some(found),
            Some(first) => warn!(
                using = %first.kind(),
                ignored = %found.kind(),
                "both SAI360 credential kinds are configured; select one explicitly"
            ),
        }
    }
    let chosen = chosen.ok_or(CredentialError::NotConfigured)?;
    debug!(kind = %chosen.kind(), base_url = chosen.base_url(), "resolved SAI360 credentials");
    Ok(chosen)
}
