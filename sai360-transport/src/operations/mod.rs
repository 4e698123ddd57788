//! Typed SAI360 operations on top of [`Dispatcher`].
//!
//! Unlike [`Dispatcher::dispatch`], every operation here fails on an error
//! status with [`DispatchError::Api`], whose message carries the platform
//! messages and, when readable, the server log.

mod catalog;
mod datastore;
mod graphql;
mod records;
mod session;

use sai360_core::{ApiRequest, ResponseBody, ResponseEnvelope};
use serde_json::Value as JsonValue;
use tracing::warn;

pub use datastore::GRID_PAGE_LIMIT;
pub use graphql::{GraphQlOptions, GRAPHQL_ENDPOINT};
pub use records::{QueryOutcome, SaveOutcome, XmlExport};
pub use session::VERSION_INFO_ENDPOINT;

use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;

pub struct Operations<'a> {
    dispatcher: &'a Dispatcher,
}

impl Dispatcher {
    pub fn operations(&self) -> Operations<'_> {
        Operations::new(self)
    }
}

impl<'a> Operations<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    async fn checked(&self, request: ApiRequest) -> Result<ResponseEnvelope, DispatchError> {
        let endpoint = request.endpoint.clone();
        let envelope = self
            .dispatcher
            .dispatch(request.ignore_http_status_errors(true))
            .await?;
        if !envelope.is_error() {
            return Ok(envelope);
        }
        warn!(
            status = envelope.status_code(),
            endpoint = %endpoint,
            "SAI360 operation failed"
        );
        let message = self.dispatcher.error_message_with_log(&envelope).await;
        Err(DispatchError::Api {
            message,
            envelope: Box::new(envelope),
        })
    }
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Arrays become their items, a lone value becomes a one-item list.
fn into_items(body: ResponseBody) -> Vec<JsonValue> {
    match body.into_json() {
        JsonValue::Array(items) => items,
        JsonValue::Null => Vec::new(),
        other => vec![other],
    }
}
