use sai360_core::extract::{extract_list, Extracted, RECORDS};
use sai360_core::request::CONTENT_TYPE_XML;
use sai360_core::{
    highest_severity, parse_messages, ApiRequest, ExportFormat, InstanceQuery, MessageGroup,
    MessageLevel, QueryAction, RequestBody, ResponseBody,
};
use serde_json::Value as JsonValue;
use tracing::warn;

use super::{into_items, segment, Operations};
use crate::error::DispatchError;

/// Result of a JSON save: the stored records plus any platform messages.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub records: Vec<JsonValue>,
    pub messages: Vec<MessageGroup>,
}

impl SaveOutcome {
    pub fn highest_severity(&self) -> Option<MessageLevel> {
        highest_severity(&self.messages)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlExport {
    Xml(String),
    Zip(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub query_id: u64,
    pub action: QueryAction,
    /// XML for [`QueryAction::Fetch`], the platform's confirmation for deletes.
    pub body: ResponseBody,
}

fn model_instance_endpoint(table: &str) -> String {
    format!("/api/modelinstance/{}/json", segment(table))
}

impl Operations<'_> {
    pub async fn query_records_json(&self, table: &str) -> Result<Vec<JsonValue>, DispatchError> {
        let envelope = self
            .checked(ApiRequest::get(model_instance_endpoint(table)))
            .await?;
        Ok(match envelope.response.body {
            ResponseBody::Json(body) => match extract_list(&body, RECORDS) {
                Extracted::Found { items, .. } => items,
                Extracted::NotFound => vec![body],
            },
            other => into_items(other),
        })
    }

    /// Saves `records`; `batch_size` of zero or `None` lets the platform decide.
    pub async fn save_records_json(
        &self,
        table: &str,
        records: Vec<JsonValue>,
        batch_size: Option<u32>,
    ) -> Result<SaveOutcome, DispatchError> {
        let mut request =
            ApiRequest::post(model_instance_endpoint(table)).body(JsonValue::Array(records));
        if let Some(size) = batch_size.filter(|s| *s > 0) {
            request = request.query("batchsize", size.to_string());
        }
        let envelope = self.checked(request).await?;

        let messages = envelope
            .response
            .body
            .as_json()
            .map(parse_messages)
            .unwrap_or_default();
        let outcome = SaveOutcome {
            records: into_items(envelope.response.body),
            messages,
        };
        if let Some(level) = outcome.highest_severity() {
            if level <= MessageLevel::Warning {
                warn!(table, level = %level, "SAI360 save reported problems");
            }
        }
        Ok(outcome)
    }

    /// Posts an XML instance document and returns the platform's XML answer.
    pub async fn save_records_xml(
        &self,
        table: &str,
        xml: impl Into<String>,
    ) -> Result<String, DispatchError> {
        let request = ApiRequest::post("/api/instances")
            .query("class", table)
            .body(RequestBody::Raw(xml.into()))
            .json(false)
            .header("Content-Type", CONTENT_TYPE_XML)
            .header("Accept", "*/*");
        let envelope = self.checked(request).await?;
        Ok(envelope.response.body.to_display_string())
    }

    pub async fn query_records_xml(
        &self,
        query: &InstanceQuery,
        format: ExportFormat,
    ) -> Result<XmlExport, DispatchError> {
        let mut request = ApiRequest::get("/api/instances/")
            .json(false)
            .header("Accept", format.accept());
        for (name, value) in query.export_params() {
            request = request.query(name, value);
        }
        let body = self.checked(request).await?.response.body;
        Ok(match format {
            ExportFormat::Xml => XmlExport::Xml(body.to_display_string()),
            ExportFormat::Zip => XmlExport::Zip(match body {
                ResponseBody::Binary(bytes) => bytes,
                ResponseBody::Text(text) => text.into_bytes(),
                ResponseBody::Json(v) => v.to_string().into_bytes(),
                ResponseBody::Empty => Vec::new(),
            }),
        })
    }

    /// Stores `query` on the platform, then fetches or deletes what it selects.
    pub async fn query_or_delete(
        &self,
        query: &InstanceQuery,
        action: QueryAction,
    ) -> Result<QueryOutcome, DispatchError> {
        let stored = self
            .checked(
                ApiRequest::post("/api/instances/query")
                    .body(RequestBody::Form(query.form_fields()))
                    .json(false),
            )
            .await?;
        let query_id = parse_query_id(&stored.response.body).ok_or_else(|| {
            DispatchError::UnexpectedResponse(
                "unable to extract queryId from POST response".to_string(),
            )
        })?;

        let endpoint = format!("/api/instances/query/{query_id}");
        let request = match action {
            QueryAction::Fetch => query
                .result_params()
                .into_iter()
                .fold(ApiRequest::get(endpoint), |r, (k, v)| r.query(k, v)),
            QueryAction::Delete => ApiRequest::delete(endpoint),
        };
        let envelope = self.checked(request.json(false)).await?;
        Ok(QueryOutcome {
            query_id,
            action,
            body: envelope.response.body,
        })
    }
}

fn parse_query_id(body: &ResponseBody) -> Option<u64> {
    match body {
        ResponseBody::Json(JsonValue::Number(n)) => n.as_u64(),
        ResponseBody::Json(JsonValue::String(s)) | ResponseBody::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}
