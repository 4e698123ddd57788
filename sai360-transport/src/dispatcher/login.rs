use std::time::Duration;

use sai360_core::request::CONTENT_TYPE_FORM;
use sai360_core::{build_url, is_error_status, HttpMethod, RequestBody, Secret};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::DispatchError;
use crate::http::{HttpClient, HttpRequestParts};
use crate::session::SessionToken;

pub const LOGIN_ENDPOINT: &str = "/api/login";

/// Parsed `/api/login` answer. Platform versions differ in the field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginResponse {
    pub sessionid: Option<String>,
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn from_json(value: &JsonValue) -> Self {
        // Some deployments answer with a numeric session id.
        let field = |name: &str| match value.get(name)? {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        };
        Self {
            sessionid: field("sessionid"),
            token: field("token"),
        }
    }

    /// `sessionid` first, `token` second.
    pub fn session_token(&self) -> Option<SessionToken> {
        self.sessionid
            .as_deref()
            .or(self.token.as_deref())
            .map(SessionToken::new)
    }
}

/// Exchanges username/password for a session identifier.
///
/// An answer without `sessionid` or `token` is [`DispatchError::MissingSessionToken`].
pub async fn login(
    http: &dyn HttpClient,
    base_url: &str,
    username: &str,
    password: &Secret,
    timeout: Duration,
    max_response_bytes: usize,
) -> Result<LoginResponse, DispatchError> {
    let form = RequestBody::Form(vec![
        ("username".to_string(), username.to_string()),
        ("password".to_string(), password.expose().to_string()),
    ]);
    let mut req = HttpRequestParts {
        method: HttpMethod::Post,
        url: build_url(base_url, LOGIN_ENDPOINT, &[])?,
        headers: Default::default(),
        body: Some(form.to_bytes()?),
    };
    req.set_header("Content-Type", CONTENT_TYPE_FORM);
    req.set_header("Accept", "application/json");

    debug!(url = %req.url, username, "logging in to SAI360");
    let resp = http.send(req, timeout, max_response_bytes).await?;
    let body = String::from_utf8_lossy(&resp.body).into_owned();
    if is_error_status(resp.status) {
        return Err(DispatchError::LoginFailed {
            status: resp.status,
            body,
        });
    }

    let value: JsonValue = serde_json::from_str(&body)
        .map_err(|e| DispatchError::LoginResponse(e.to_string()))?;
    let login = LoginResponse::from_json(&value);
    if login.session_token().is_none() {
        return Err(DispatchError::MissingSessionToken);
    }
    Ok(login)
}
