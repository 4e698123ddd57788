use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sai360_core::{OAuth2Credentials, Secret};

use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};

/// Sends a request with a bearer token attached. Obtaining and refreshing the
/// token is the implementor's job; the dispatcher never sees it.
#[async_trait]
pub trait AuthenticatedSender: Send + Sync {
    async fn send(
        &self,
        credentials: &OAuth2Credentials,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError>;
}

/// Attaches an access token issued elsewhere.
pub struct StaticBearerSender {
    http: Arc<dyn HttpClient>,
    access_token: Secret,
}

impl StaticBearerSender {
    pub fn new(http: Arc<dyn HttpClient>, access_token: impl Into<Secret>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl AuthenticatedSender for StaticBearerSender {
    async fn send(
        &self,
        _credentials: &OAuth2Credentials,
        mut req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        req.set_header(
            "Authorization",
            format!("Bearer {}", self.access_token.expose()),
        );
        self.http.send(req, timeout, max_response_bytes).await
    }
}
