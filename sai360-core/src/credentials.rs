use std::fmt;

use serde::Deserialize;

use crate::secret::Secret;

pub const DEFAULT_OAUTH2_SCOPE: &str = "offline_access";
pub const DEFAULT_OAUTH2_GRANT_TYPE: &str = "authorizationCode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialKind {
    /// Username/password exchanged for a `bwise-session` token.
    Session,
    OAuth2,
}

impl CredentialKind {
    /// Credential type name as registered on the automation host.
    pub fn credential_name(self) -> &'static str {
        match self {
            CredentialKind::Session => "sai360GrcBasicApi",
            CredentialKind::OAuth2 => "sai360GrcOAuth2Api",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.credential_name())
    }
}

/// Which credential set a caller wants the dispatcher to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialSelection {
    /// Session credentials if present, otherwise OAuth2.
    #[default]
    Auto,
    Session,
    OAuth2,
}

impl CredentialSelection {
    /// Kinds to try, in order.
    pub fn candidates(self) -> &'static [CredentialKind] {
        match self {
            CredentialSelection::Auto => &[CredentialKind::Session, CredentialKind::OAuth2],
            CredentialSelection::Session => &[CredentialKind::Session],
            CredentialSelection::OAuth2 => &[CredentialKind::OAuth2],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredentials {
    /// Includes the context path where one applies, e.g. `https://customer.sai360.net/bwise`.
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    pub password: Secret,
}

impl SessionCredentials {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Credentials {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: Secret,
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default, alias = "tokenUrl")]
    pub access_token_url: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
}

impl OAuth2Credentials {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<Secret>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: None,
            access_token_url: None,
            scope: default_scope(),
            grant_type: default_grant_type(),
        }
    }

    /// `{baseUrl}/api/oauth2/authorize` unless configured explicitly.
    pub fn authorize_url(&self) -> String {
        self.auth_url
            .clone()
            .unwrap_or_else(|| format!("{}/api/oauth2/authorize", self.base_url.trim_end_matches('/')))
    }

    /// `{baseUrl}/api/oauth2/token` unless configured explicitly.
    pub fn token_url(&self) -> String {
        self.access_token_url
            .clone()
            .unwrap_or_else(|| format!("{}/api/oauth2/token", self.base_url.trim_end_matches('/')))
    }
}

fn default_scope() -> String {
    DEFAULT_OAUTH2_SCOPE.to_string()
}

fn default_grant_type() -> String {
    DEFAULT_OAUTH2_GRANT_TYPE.to_string()
}

#[derive(Debug, Clone)]
pub enum CredentialSet {
    Session(SessionCredentials),
    OAuth2(OAuth2Credentials),
}

impl CredentialSet {
    pub fn kind(&self) -> CredentialKind {
        match self {
            CredentialSet::Session(_) => CredentialKind::Session,
            CredentialSet::OAuth2(_) => CredentialKind::OAuth2,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            CredentialSet::Session(c) => &c.base_url,
            CredentialSet::OAuth2(c) => &c.base_url,
        }
    }
}

impl From<SessionCredentials> for CredentialSet {
    fn from(value: SessionCredentials) -> Self {
        CredentialSet::Session(value)
    }
}

impl From<OAuth2Credentials> for CredentialSet {
    fn from(value: OAuth2Credentials) -> Self {
        CredentialSet::OAuth2(value)
    }
}
