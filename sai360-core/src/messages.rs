use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Message levels in a SAI360 save response, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageLevel {
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl MessageLevel {
    pub const ALL: [MessageLevel; 6] = [
        MessageLevel::Fatal,
        MessageLevel::Error,
        MessageLevel::Warning,
        MessageLevel::Info,
        MessageLevel::Debug,
        MessageLevel::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageLevel::Fatal => "FATAL",
            MessageLevel::Error => "ERROR",
            MessageLevel::Warning => "WARNING",
            MessageLevel::Info => "INFO",
            MessageLevel::Debug => "DEBUG",
            MessageLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageGroup {
    pub level: MessageLevel,
    pub messages: Vec<String>,
}

/// Non-empty message groups of `body`, in severity order.
pub fn parse_messages(body: &JsonValue) -> Vec<MessageGroup> {
    let Some(obj) = body.as_object() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for level in MessageLevel::ALL {
        let Some(JsonValue::Array(items)) = obj.get(level.as_str()) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }
        let messages = items
            .iter()
            .map(|m| match m {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        out.push(MessageGroup { level, messages });
    }
    out
}

/// `LEVEL: a; b` lines joined with `\n`; empty when nothing was reported.
pub fn format_messages(groups: &[MessageGroup]) -> String {
    groups
        .iter()
        .map(|g| format!("{}: {}", g.level, g.messages.join("; ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn highest_severity(groups: &[MessageGroup]) -> Option<MessageLevel> {
    groups.iter().map(|g| g.level).min()
}
