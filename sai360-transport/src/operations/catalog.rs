use sai360_core::extract::{Extractor, CLASS_ATTRIBUTES, DATASTORES, TABLE_CLASSES};
use sai360_core::{decode_list, ApiRequest, ClassAttribute, DatastoreEntry, TableEntry};
use serde::de::DeserializeOwned;

use super::{segment, Operations};
use crate::error::DispatchError;

impl Operations<'_> {
    pub async fn list_datastores(&self) -> Result<Vec<DatastoreEntry>, DispatchError> {
        self.list("/api/datastoreservice/datastores", DATASTORES)
            .await
    }

    pub async fn list_tables(&self) -> Result<Vec<TableEntry>, DispatchError> {
        self.list("/api/datamodel/classes", TABLE_CLASSES).await
    }

    pub async fn class_attributes(
        &self,
        class_name: &str,
    ) -> Result<Vec<ClassAttribute>, DispatchError> {
        let endpoint = format!("/api/datamodel/class/{}", segment(class_name));
        self.list(&endpoint, CLASS_ATTRIBUTES).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        chain: &[Extractor],
    ) -> Result<Vec<T>, DispatchError> {
        let envelope = self.checked(ApiRequest::get(endpoint)).await?;
        let Some(body) = envelope.response.body.as_json() else {
            return Ok(Vec::new());
        };
        decode_list(body, chain)
            .map_err(|e| DispatchError::UnexpectedResponse(format!("{endpoint}: {e}")))
    }
}
