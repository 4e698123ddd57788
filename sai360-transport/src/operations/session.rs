use sai360_core::{strip_tags, ApiRequest, ResponseBody};

use super::Operations;
use crate::error::DispatchError;

pub const VERSION_INFO_ENDPOINT: &str = "/versioninfo";

impl Operations<'_> {
    /// Platform version page with the markup removed.
    pub async fn version_info(&self) -> Result<String, DispatchError> {
        let envelope = self
            .checked(ApiRequest::get(VERSION_INFO_ENDPOINT).json(false))
            .await?;
        Ok(match envelope.response.body {
            ResponseBody::Text(html) => strip_tags(&html),
            other => other.to_display_string(),
        })
    }
}
