//! Locating the list payload in responses whose shape varies between
//! platform versions (a bare array, or an array under one of several fields).

use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// The body itself is an array.
    Root,
    Field(&'static str),
}

impl Extractor {
    pub fn name(self) -> &'static str {
        match self {
            Extractor::Root => "$",
            Extractor::Field(f) => f,
        }
    }

    fn apply(self, body: &JsonValue) -> Option<&Vec<JsonValue>> {
        match self {
            Extractor::Root => body.as_array(),
            Extractor::Field(f) => body.as_object()?.get(f)?.as_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Found {
        field: &'static str,
        items: Vec<JsonValue>,
    },
    NotFound,
}

impl Extracted {
    pub fn items(self) -> Vec<JsonValue> {
        match self {
            Extracted::Found { items, .. } => items,
            Extracted::NotFound => Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found { .. })
    }
}

/// `/api/datamodel/classes`
pub const TABLE_CLASSES: &[Extractor] = &[
    Extractor::Root,
    Extractor::Field("classes"),
    Extractor::Field("items"),
    Extractor::Field("entries"),
];

/// `/api/datamodel/class/{name}`
pub const CLASS_ATTRIBUTES: &[Extractor] = &[
    Extractor::Root,
    Extractor::Field("attributes"),
    Extractor::Field("fields"),
    Extractor::Field("properties"),
];

/// `/api/datastoreservice/datastores`
pub const DATASTORES: &[Extractor] = &[Extractor::Field("entries")];

/// `/api/modelinstance/{table}/json`
pub const RECORDS: &[Extractor] = &[
    Extractor::Root,
    Extractor::Field("items"),
    Extractor::Field("instances"),
];

/// First extractor in `chain` that yields an array wins.
pub fn extract_list(body: &JsonValue, chain: &[Extractor]) -> Extracted {
    for extractor in chain {
        if let Some(items) = extractor.apply(body) {
            return Extracted::Found {
                field: extractor.name(),
                items: items.clone(),
            };
        }
    }
    Extracted::NotFound
}
