use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

pub const SESSION_HEADER: &str = "bwise-session";
pub const REDACTED: &str = "<redacted>";

/// Header names whose values never appear in an envelope echo.
#[derive(Debug, Clone)]
pub struct SensitiveHeaders {
    /// Lowercased header names.
    pub names: Vec<String>,
}

impl Default for SensitiveHeaders {
    fn default() -> Self {
        Self {
            names: vec![
                "authorization".to_string(),
                "cookie".to_string(),
                "set-cookie".to_string(),
                SESSION_HEADER.to_string(),
            ],
        }
    }
}

impl SensitiveHeaders {
    pub fn with(mut self, name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if !self.names.contains(&lower) {
            self.names.push(lower);
        }
        self
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Flattens a host-supplied JSON header object. Primitive values are kept;
/// arrays of primitives are joined with `", "`.
pub fn sanitize_headers(headers: &serde_json::Map<String, JsonValue>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers {
        if let Some(s) = primitive_header_value(value) {
            out.insert(name.clone(), s);
        }
    }
    out
}

fn primitive_header_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    JsonValue::Array(_) | JsonValue::Object(_) | JsonValue::Null => return None,
                    other => parts.push(primitive_header_value(other)?),
                }
            }
            Some(parts.join(", "))
        }
        JsonValue::Null | JsonValue::Object(_) => None,
    }
}

/// Folds raw header pairs into one entry per name.
///
/// Repeated names (case-insensitive, first spelling wins) are joined with `", "`.
/// Values that are not valid UTF-8 are dropped.
pub fn collect_header_pairs<'a, I>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (name, raw) in pairs {
        let Ok(value) = std::str::from_utf8(raw) else {
            continue;
        };
        match grouped.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((name.to_string(), vec![value.to_string()])),
        }
    }
    grouped
        .into_iter()
        .map(|(name, values)| (name, values.join(", ")))
        .collect()
}

pub fn redact_headers(
    headers: &BTreeMap<String, String>,
    sensitive: &SensitiveHeaders,
) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            if sensitive.is_sensitive(k) {
                (k.clone(), REDACTED.to_string())
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}
