use serde_json::{Map, Value as JsonValue};

use crate::error::RequestError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Map<String, JsonValue>,
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// `{query, variables?, operationName?}`; empty variables and blank
    /// operation names are left out.
    pub fn to_body(&self) -> Result<JsonValue, RequestError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        let mut body = Map::new();
        body.insert("query".to_string(), JsonValue::String(query.to_string()));
        if !self.variables.is_empty() {
            body.insert(
                "variables".to_string(),
                JsonValue::Object(self.variables.clone()),
            );
        }
        if let Some(name) = self.operation_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                body.insert(
                    "operationName".to_string(),
                    JsonValue::String(name.to_string()),
                );
            }
        }
        Ok(JsonValue::Object(body))
    }
}

/// The `errors` array of a GraphQL answer, as `msg1; msg2`.
pub fn graphql_errors(body: &JsonValue) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    Some(
        errors
            .iter()
            .map(|e| match e.get("message").and_then(JsonValue::as_str) {
                Some(m) => m.to_string(),
                None => e.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
    )
}
