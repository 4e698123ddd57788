//! Typed entries of the data-model and datastore listings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::extract::{extract_list, Extractor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatastoreEntry {
    pub identifier: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub object_id: Option<String>,
}

impl DatastoreEntry {
    /// `Label (identifier)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.label, self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TableEntry {
    pub fn display_name(&self) -> String {
        let label = self.label.as_deref().filter(|l| !l.is_empty());
        format!("{} ({})", label.unwrap_or(&self.name), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAttribute {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ClassAttribute {
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Finds the list in `body` with `chain` and decodes every item as `T`.
/// A body without any list decodes to an empty vector.
pub fn decode_list<T: DeserializeOwned>(
    body: &JsonValue,
    chain: &[Extractor],
) -> Result<Vec<T>, serde_json::Error> {
    extract_list(body, chain)
        .items()
        .into_iter()
        .map(serde_json::from_value)
        .collect()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}
