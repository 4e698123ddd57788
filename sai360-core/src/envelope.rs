use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::messages::{format_messages, parse_messages};
use crate::request::{HttpMethod, RequestBody};

/// First status code treated as an error.
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

pub fn is_error_status(status: u16) -> bool {
    status >= ERROR_STATUS_THRESHOLD
}

/// Statuses that mean the session token was rejected.
pub fn is_auth_expiry(status: u16) -> bool {
    status == 401 || status == 403
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(JsonValue),
    Text(String),
    /// Payloads that are not UTF-8, such as ZIP exports.
    Binary(Vec<u8>),
    Empty,
}

impl ResponseBody {
    /// Decodes a raw payload. JSON is attempted when the caller asked for it or
    /// the server labelled the payload as JSON.
    pub fn decode(bytes: &[u8], want_json: bool, content_type: Option<&str>) -> Self {
        if bytes.is_empty() {
            return ResponseBody::Empty;
        }
        let Ok(text) = std::str::from_utf8(bytes) else {
            return ResponseBody::Binary(bytes.to_vec());
        };
        let labelled_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if want_json || labelled_json {
            if let Ok(v) = serde_json::from_str::<JsonValue>(text) {
                return ResponseBody::Json(v);
            }
        }
        ResponseBody::Text(text.to_string())
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            ResponseBody::Json(JsonValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn into_json(self) -> JsonValue {
        match self {
            ResponseBody::Json(v) => v,
            ResponseBody::Text(s) => JsonValue::String(s),
            ResponseBody::Binary(b) => JsonValue::String(String::from_utf8_lossy(&b).into_owned()),
            ResponseBody::Empty => JsonValue::Null,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    pub fn to_display_string(&self) -> String {
        match self {
            ResponseBody::Json(JsonValue::String(s)) => s.clone(),
            ResponseBody::Json(v) => v.to_string(),
            ResponseBody::Text(s) => s.clone(),
            ResponseBody::Binary(b) => format!("<{} bytes of binary data>", b.len()),
            ResponseBody::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEcho {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
}

impl RequestEcho {
    pub fn echo_body(body: Option<&RequestBody>) -> Option<JsonValue> {
        match body? {
            RequestBody::Json(v) => Some(v.clone()),
            RequestBody::Raw(s) => Some(JsonValue::String(s.clone())),
            RequestBody::Form(pairs) => Some(JsonValue::String(crate::request::encode_form(pairs))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetails {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
    pub is_error: bool,
}

impl ResponseDetails {
    pub fn new(status_code: u16, headers: BTreeMap<String, String>, body: ResponseBody) -> Self {
        Self {
            status_code,
            headers,
            body,
            is_error: is_error_status(status_code),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What every caller above the transport consumes, whatever the HTTP outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub request: RequestEcho,
    pub response: ResponseDetails,
}

impl ResponseEnvelope {
    pub fn is_error(&self) -> bool {
        self.response.is_error
    }

    pub fn status_code(&self) -> u16 {
        self.response.status_code
    }

    pub fn body(&self) -> &ResponseBody {
        &self.response.body
    }

    /// Human-readable failure text, preferring SAI360 message groups over the raw body.
    pub fn error_message(&self) -> String {
        format!(
            "Request failed with status {}:\n{}",
            self.response.status_code,
            describe_body(&self.response.body)
        )
    }
}

pub fn describe_body(body: &ResponseBody) -> String {
    if let ResponseBody::Json(v) = body {
        let groups = parse_messages(v);
        if !groups.is_empty() {
            return format_messages(&groups);
        }
    }
    body.to_display_string()
}
