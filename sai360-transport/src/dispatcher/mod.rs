//! The authenticated request dispatcher.
//!
//! Session credentials are exchanged for a token on first use, cached in the
//! injected [`TokenStore`] and sent as the session header. A 401/403 answer
//! drops the cached token, logs in again and repeats the request once.
//! OAuth2 requests are handed to an [`AuthenticatedSender`] unchanged.

mod login;
mod oauth2;

use std::sync::Arc;

use sai360_core::headers::redact_headers;
use sai360_core::{
    build_url, is_auth_expiry, ApiRequest, CredentialKind, CredentialSelection, CredentialSet,
    OAuth2Credentials, RequestBody, RequestEcho, ResponseBody, ResponseDetails, ResponseEnvelope,
    SessionCredentials,
};
use tracing::{debug, warn};

pub use login::{login, LoginResponse, LOGIN_ENDPOINT};
pub use oauth2::{AuthenticatedSender, StaticBearerSender};

use crate::config::DispatcherConfig;
use crate::credentials::{resolve_credentials, CredentialStore};
use crate::error::DispatchError;
use crate::http::{HttpClient, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
use crate::session::{MemoryTokenStore, SessionToken, TokenStore};

pub const LOG_ENDPOINT: &str = "/api/log";

enum Auth {
    Session(SessionCredentials),
    OAuth2 {
        credentials: OAuth2Credentials,
        sender: Arc<dyn AuthenticatedSender>,
    },
}

impl Auth {
    fn base_url(&self) -> &str {
        match self {
            Auth::Session(c) => &c.base_url,
            Auth::OAuth2 { credentials, .. } => &credentials.base_url,
        }
    }

    fn kind(&self) -> CredentialKind {
        match self {
            Auth::Session(_) => CredentialKind::Session,
            Auth::OAuth2 { .. } => CredentialKind::OAuth2,
        }
    }
}

#[derive(Default)]
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    http: Option<Arc<dyn HttpClient>>,
    tokens: Option<Arc<dyn TokenStore>>,
    oauth2_sender: Option<Arc<dyn AuthenticatedSender>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Execution-scoped token slot; defaults to a fresh in-memory store.
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn oauth2_sender(mut self, sender: Arc<dyn AuthenticatedSender>) -> Self {
        self.oauth2_sender = Some(sender);
        self
    }

    pub fn build(self, credentials: CredentialSet) -> Result<Dispatcher, DispatchError> {
        let auth = match credentials {
            CredentialSet::Session(c) => Auth::Session(c),
            CredentialSet::OAuth2(c) => Auth::OAuth2 {
                credentials: c,
                sender: self
                    .oauth2_sender
                    .ok_or(DispatchError::OAuth2SenderMissing)?,
            },
        };
        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new(&self.config)?),
        };
        let tokens: Arc<dyn TokenStore> = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(MemoryTokenStore::new()),
        };
        Ok(Dispatcher {
            tokens,
            http,
            auth,
            config: self.config,
        })
    }

    /// Resolves credentials once; the chosen kind is fixed for the dispatcher's lifetime.
    pub async fn build_from_store(
        self,
        store: &dyn CredentialStore,
        selection: CredentialSelection,
    ) -> Result<Dispatcher, DispatchError> {
        let credentials = resolve_credentials(store, selection).await?;
        self.build(credentials)
    }
}

pub struct Dispatcher {
    config: DispatcherConfig,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
    auth: Auth,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn credential_kind(&self) -> CredentialKind {
        self.auth.kind()
    }

    pub fn base_url(&self) -> &str {
        self.auth.base_url()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Issues `request` and reports the outcome as an envelope.
    ///
    /// Error statuses are returned as data (`is_error`) unless the request
    /// opted out with `ignore_http_status_errors(false)`, in which case they
    /// become [`DispatchError::Status`].
    pub async fn dispatch(&self, request: ApiRequest) -> Result<ResponseEnvelope, DispatchError> {
        let parts = self.prepare(&request)?;
        debug!(
            method = %request.method,
            url = %parts.url,
            auth = %self.auth.kind(),
            has_body = parts.body.is_some(),
            "dispatching SAI360 request"
        );
        match &self.auth {
            Auth::OAuth2 {
                credentials,
                sender,
            } => {
                let resp = sender
                    .send(
                        credentials,
                        parts.clone(),
                        self.config.timeout(),
                        self.config.max_response_bytes,
                    )
                    .await?;
                self.finish(&request, &parts, resp)
            }
            Auth::Session(credentials) => self.dispatch_session(credentials, &request, parts).await,
        }
    }

    /// Returns the decoded body, treating any error status as a failure.
    pub async fn request(&self, request: ApiRequest) -> Result<ResponseBody, DispatchError> {
        let envelope = self
            .dispatch(request.ignore_http_status_errors(false))
            .await?;
        Ok(envelope.response.body)
    }

    /// Logs in with the configured session credentials without touching the cache.
    pub async fn login(&self) -> Result<LoginResponse, DispatchError> {
        match &self.auth {
            Auth::Session(credentials) => self.login_with(credentials).await,
            Auth::OAuth2 { .. } => Err(DispatchError::SessionRequired),
        }
    }

    /// Drops the cached session token; the next call logs in again.
    pub async fn invalidate_session(&self) -> Result<(), DispatchError> {
        self.tokens.clear().await?;
        Ok(())
    }

    /// The server-side log of the current session, as plain text.
    pub async fn fetch_log(&self) -> Result<String, DispatchError> {
        let body = self
            .request(
                ApiRequest::get(LOG_ENDPOINT)
                    .json(false)
                    .header("Accept", "text/plain"),
            )
            .await?;
        Ok(body.to_display_string())
    }

    /// [`ResponseEnvelope::error_message`] followed by the server log, when one can be read.
    pub async fn error_message_with_log(&self, envelope: &ResponseEnvelope) -> String {
        let message = envelope.error_message();
        match self.fetch_log().await {
            Ok(log) if !log.trim().is_empty() => format!("{message}\n\nServer log:\n{}", log.trim_end()),
            Ok(_) => message,
            Err(e) => {
                debug!(error = %e, "could not read SAI360 log");
                message
            }
        }
    }

    async fn dispatch_session(
        &self,
        credentials: &SessionCredentials,
        request: &ApiRequest,
        mut parts: HttpRequestParts,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let token = match self.tokens.get().await? {
            Some(token) => token,
            None => self.login_and_cache(credentials).await?,
        };
        parts.set_header(&self.config.session_header, token.expose());

        let mut resp = self.send(&parts).await?;
        if is_auth_expiry(resp.status) {
            warn!(
                status = resp.status,
                url = %parts.url,
                "SAI360 session rejected; logging in again"
            );
            self.tokens.clear().await?;
            let token = match self.login_and_cache(credentials).await {
                Err(DispatchError::MissingSessionToken) => {
                    return Err(DispatchError::LoginRetryFailed)
                }
                other => other?,
            };
            parts.set_header(&self.config.session_header, token.expose());
            resp = self.send(&parts).await?;
        }
        self.finish(request, &parts, resp)
    }

    async fn login_and_cache(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<SessionToken, DispatchError> {
        let token = self
            .login_with(credentials)
            .await?
            .session_token()
            .ok_or(DispatchError::MissingSessionToken)?;
        self.tokens.set(token.clone()).await?;
        Ok(token)
    }

    async fn login_with(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<LoginResponse, DispatchError> {
        login(
            self.http.as_ref(),
            &credentials.base_url,
            &credentials.username,
            &credentials.password,
            self.config.timeout(),
            self.config.max_response_bytes,
        )
        .await
    }

    async fn send(&self, parts: &HttpRequestParts) -> Result<HttpResponseParts, DispatchError> {
        Ok(self
            .http
            .send(
                parts.clone(),
                self.config.timeout(),
                self.config.max_response_bytes,
            )
            .await?)
    }

    fn prepare(&self, request: &ApiRequest) -> Result<HttpRequestParts, DispatchError> {
        let url = build_url(self.auth.base_url(), &request.endpoint, &request.query)?;
        let body = request
            .outgoing_body()
            .map(RequestBody::to_bytes)
            .transpose()?;
        let mut parts = HttpRequestParts {
            method: request.method,
            url,
            headers: self.config.default_headers(),
            body,
        };
        for (name, value) in request.effective_headers() {
            parts.set_header(&name, value);
        }
        Ok(parts)
    }

    fn finish(
        &self,
        request: &ApiRequest,
        parts: &HttpRequestParts,
        resp: HttpResponseParts,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let sensitive = self.config.sensitive_headers();
        let headers = resp.header_map();
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str());
        let body = ResponseBody::decode(&resp.body, request.options.json, content_type);

        let envelope = ResponseEnvelope {
            request: RequestEcho {
                method: request.method,
                url: parts.url.to_string(),
                headers: redact_headers(&parts.headers, &sensitive),
                body: RequestEcho::echo_body(request.outgoing_body()),
            },
            response: ResponseDetails::new(resp.status, redact_headers(&headers, &sensitive), body),
        };
        debug!(
            status = envelope.response.status_code,
            is_error = envelope.response.is_error,
            "SAI360 response received"
        );

        if envelope.is_error() && !request.options.ignore_http_status_errors {
            return Err(DispatchError::Status {
                envelope: Box::new(envelope),
            });
        }
        Ok(envelope)
    }
}
