use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::RequestError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_XML: &str = "application/xml";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(RequestError::UnknownMethod(s.to_string())),
        }
    }
}

/// Outgoing payload. `Raw` carries XML or other pre-rendered text.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(JsonValue),
    Raw(String),
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Empty bodies are never put on the wire.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Json(JsonValue::Null) => true,
            RequestBody::Json(JsonValue::Object(m)) => m.is_empty(),
            RequestBody::Json(JsonValue::Array(a)) => a.is_empty(),
            RequestBody::Json(JsonValue::String(s)) => s.is_empty(),
            RequestBody::Json(_) => false,
            RequestBody::Raw(s) => s.is_empty(),
            RequestBody::Form(pairs) => pairs.is_empty(),
        }
    }

    pub fn default_content_type(&self) -> &'static str {
        match self {
            RequestBody::Json(_) => CONTENT_TYPE_JSON,
            RequestBody::Raw(s) if s.trim_start().starts_with('<') => CONTENT_TYPE_XML,
            RequestBody::Raw(_) => CONTENT_TYPE_TEXT,
            RequestBody::Form(_) => CONTENT_TYPE_FORM,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RequestError> {
        match self {
            RequestBody::Json(v) => serde_json::to_vec(v).map_err(RequestError::Body),
            RequestBody::Raw(s) => Ok(s.as_bytes().to_vec()),
            RequestBody::Form(pairs) => Ok(encode_form(pairs).into_bytes()),
        }
    }
}

impl From<JsonValue> for RequestBody {
    fn from(value: JsonValue) -> Self {
        RequestBody::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        RequestBody::Raw(value)
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        RequestBody::Raw(value.to_string())
    }
}

pub fn encode_form(pairs: &[(String, String)]) -> String {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        ser.append_pair(k, v);
    }
    ser.finish()
}

/// Per-call overrides merged over the dispatcher defaults.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    /// Ask for JSON and decode JSON responses.
    pub json: bool,
    /// Report 4xx/5xx through the envelope instead of failing the call.
    pub ignore_http_status_errors: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: BTreeMap::new(),
            json: true,
            ignore_http_status_errors: true,
        }
    }
}

impl RequestOptions {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the credential base URL; may carry its own query string.
    pub endpoint: String,
    pub body: Option<RequestBody>,
    pub query: Vec<(String, String)>,
    pub options: RequestOptions,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.options.json = json;
        self
    }

    pub fn ignore_http_status_errors(mut self, ignore: bool) -> Self {
        self.options.ignore_http_status_errors = ignore;
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// The body that goes on the wire, if any.
    pub fn outgoing_body(&self) -> Option<&RequestBody> {
        self.body.as_ref().filter(|b| !b.is_empty())
    }

    /// Final header set: content negotiation defaults, then caller headers.
    pub fn effective_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        if self.options.json {
            headers.insert("Accept".to_string(), CONTENT_TYPE_JSON.to_string());
        }
        if let Some(body) = self.outgoing_body() {
            headers.insert("Content-Type".to_string(), body.default_content_type().to_string());
        }
        for (k, v) in &self.options.headers {
            let existing = headers
                .keys()
                .find(|h| h.eq_ignore_ascii_case(k))
                .cloned();
            if let Some(existing) = existing {
                headers.remove(&existing);
            }
            headers.insert(k.clone(), v.clone());
        }
        headers
    }
}

/// Joins `base_url` and `endpoint` and appends `query`.
pub fn build_url(
    base_url: &str,
    endpoint: &str,
    query: &[(String, String)],
) -> Result<url::Url, RequestError> {
    if base_url.trim().is_empty() {
        return Err(RequestError::MissingBaseUrl);
    }
    let base = base_url.trim_end_matches('/');
    let joined = if endpoint.is_empty() || endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    };
    let mut url = url::Url::parse(&joined).map_err(|source| RequestError::InvalidUrl {
        url: joined.clone(),
        source,
    })?;
    if !query.is_empty() {
        let mut qp = url.query_pairs_mut();
        for (k, v) in query {
            qp.append_pair(k, v);
        }
    }
    Ok(url)
}
