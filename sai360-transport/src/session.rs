use std::fmt;

use async_trait::async_trait;
use sai360_core::Secret;
use tokio::sync::RwLock;

/// Opaque token issued by `/api/login`, sent back as the session header.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Secret);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("session token store error: {0}")]
pub struct TokenStoreError(pub String);

/// The single cached-token slot shared by every call of one workflow run.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<SessionToken>, TokenStoreError>;

    async fn set(&self, token: SessionToken) -> Result<(), TokenStoreError>;

    async fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, token: SessionToken) -> Result<(), TokenStoreError> {
        *self.slot.write().await = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}
