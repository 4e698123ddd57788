use sai360_core::ApiRequest;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{into_items, segment, Operations};
use crate::error::DispatchError;

/// Items fetched in one go by [`Operations::execute_datastore`].
pub const GRID_PAGE_LIMIT: u32 = 10_000;

impl Operations<'_> {
    /// Runs the datastore query and returns the grid descriptor, whose `id`
    /// addresses the result pages.
    pub async fn prime_datastore(&self, datastore_id: &str) -> Result<JsonValue, DispatchError> {
        let endpoint = format!("/api/griddata/query/datastore!{}", segment(datastore_id));
        let envelope = self.checked(ApiRequest::post(endpoint)).await?;
        Ok(envelope.response.body.into_json())
    }

    /// Primes the datastore, then fetches the first [`GRID_PAGE_LIMIT`] items.
    pub async fn execute_datastore(
        &self,
        datastore_id: &str,
    ) -> Result<Vec<JsonValue>, DispatchError> {
        let grid = self.prime_datastore(datastore_id).await?;
        let grid_id = match grid.get("id") {
            Some(JsonValue::String(id)) if !id.is_empty() => id.clone(),
            Some(JsonValue::Number(id)) => id.to_string(),
            _ => {
                return Err(DispatchError::UnexpectedResponse(format!(
                    "no griddata id returned for datastore {datastore_id}"
                )))
            }
        };
        debug!(datastore_id, grid_id = %grid_id, "fetching datastore items");

        let envelope = self
            .checked(
                ApiRequest::get(format!("/api/griddata/items/{}", segment(&grid_id)))
                    .query("start", "0")
                    .query("limit", GRID_PAGE_LIMIT.to_string()),
            )
            .await?;
        Ok(into_items(envelope.response.body))
    }
}
