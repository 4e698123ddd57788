use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sai360_core::headers::sanitize_headers;
use sai360_core::{SensitiveHeaders, SESSION_HEADER};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub timeout_ms: u64,
    /// ZIP exports of large tables can be big.
    pub max_response_bytes: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub user_agent: String,
    pub session_header: String,
    /// Extra header names redacted from envelope echoes.
    pub redact_headers: Vec<String>,
    /// Sent with every request; values that are not primitives (or arrays of them) are dropped.
    pub default_headers: serde_json::Map<String, serde_json::Value>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_response_bytes: 64 * 1024 * 1024,
            follow_redirects: true,
            max_redirects: 10,
            user_agent: concat!("sai360-transport/", env!("CARGO_PKG_VERSION")).to_string(),
            session_header: SESSION_HEADER.to_string(),
            redact_headers: Vec::new(),
            default_headers: serde_json::Map::new(),
        }
    }
}

impl DispatcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn sensitive_headers(&self) -> SensitiveHeaders {
        self.redact_headers
            .iter()
            .fold(SensitiveHeaders::default().with(&self.session_header), |s, h| {
                s.with(h)
            })
    }

    pub fn default_headers(&self) -> BTreeMap<String, String> {
        sanitize_headers(&self.default_headers)
    }

    pub fn parse(input: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        parse_str(input, format)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        parse_str(&content, ConfigFormat::Auto)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_str<T: DeserializeOwned>(
    input: &str,
    format: ConfigFormat,
) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Json => Ok(serde_json::from_str(input)?),
        ConfigFormat::Yaml => Ok(serde_yaml::from_str(input)?),
        ConfigFormat::Auto => parse_auto(input),
    }
}

fn parse_auto<T: DeserializeOwned>(input: &str) -> Result<T, ConfigError> {
    // JSON always starts with `{` or `[` after trimming.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str(input) {
            Ok(v) => Ok(v),
            Err(e) => serde_yaml::from_str(input).map_err(|_| ConfigError::Json(e)),
        };
    }
    match serde_yaml::from_str(input) {
        Ok(v) => Ok(v),
        Err(e) => serde_json::from_str(input).map_err(|_| ConfigError::Yaml(e)),
    }
}
