use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use sai360_core::headers::collect_header_pairs;
use sai360_core::HttpMethod;

use crate::config::DispatcherConfig;

#[derive(Debug, Clone)]
pub struct HttpRequestParts {
    pub method: HttpMethod,
    pub url: url::Url,
    pub headers: BTreeMap<String, String>,
    /// `None` means no body on the wire.
    pub body: Option<Vec<u8>>,
}

impl HttpRequestParts {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces any existing header with the same name (case-insensitive).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.into());
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponseParts {
    pub status: u16,
    /// Raw header pairs in arrival order; names may repeat.
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Vec<u8>,
}

impl HttpResponseParts {
    pub fn header_map(&self) -> BTreeMap<String, String> {
        collect_header_pairs(
            self.headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_slice())),
        )
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("response too large (>{max_bytes} bytes)")]
    ResponseTooLarge { max_bytes: usize },
    #[error("http error: {0}")]
    Other(String),
}

/// Sends one request and reports the full response. HTTP error statuses are
/// data, not failures.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(
        &self,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError>;
}

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &DispatcherConfig) -> Result<Self, HttpError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };
        let client = reqwest::Client::builder()
            .redirect(redirect)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HttpError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        let mut rb = self
            .client
            .request(to_reqwest_method(req.method), req.url)
            .timeout(timeout);

        for (k, v) in req.headers {
            rb = rb.header(k, v);
        }
        if let Some(body) = req.body {
            rb = rb.body(body);
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();

        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();

        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        if body.len() > max_response_bytes {
            return Err(HttpError::ResponseTooLarge {
                max_bytes: max_response_bytes,
            });
        }

        Ok(HttpResponseParts {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return HttpError::Network(e.to_string());
    }
    HttpError::Other(e.to_string())
}
