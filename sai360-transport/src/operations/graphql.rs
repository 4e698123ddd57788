use sai360_core::{graphql_errors, ApiRequest, GraphQlRequest};
use serde_json::Value as JsonValue;

use super::Operations;
use crate::error::DispatchError;

pub const GRAPHQL_ENDPOINT: &str = "/api/graphql";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphQlOptions {
    /// Return the whole answer, `errors` included, instead of failing on them.
    pub return_full_response: bool,
    /// Copy `extensions` into the returned data as `_extensions`.
    pub include_extensions: bool,
}

impl Operations<'_> {
    /// Runs a GraphQL query and returns its `data` (`{}` when absent).
    pub async fn execute_graphql(
        &self,
        request: &GraphQlRequest,
        options: GraphQlOptions,
    ) -> Result<JsonValue, DispatchError> {
        let body = request.to_body()?;
        let envelope = self
            .checked(ApiRequest::post(GRAPHQL_ENDPOINT).body(body))
            .await?;
        let answer = envelope.response.body.into_json();

        if options.return_full_response {
            return Ok(answer);
        }
        if let Some(errors) = graphql_errors(&answer) {
            return Err(DispatchError::GraphQl(errors));
        }

        let mut data = match answer.get("data") {
            Some(data) if !data.is_null() => data.clone(),
            _ => JsonValue::Object(Default::default()),
        };
        if options.include_extensions {
            if let (Some(obj), Some(ext)) = (data.as_object_mut(), answer.get("extensions")) {
                obj.insert("_extensions".to_string(), ext.clone());
            }
        }
        Ok(data)
    }
}
