#![forbid(unsafe_code)]

//! Data types shared by every SAI360 GRC API caller: credential sets, the
//! request descriptor, the response envelope and the helpers that shape
//! platform responses. Nothing in this crate performs I/O.

pub mod catalog;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod graphql;
pub mod headers;
pub mod markup;
pub mod messages;
pub mod query;
pub mod request;
mod secret;

pub use crate::catalog::{decode_list, ClassAttribute, DatastoreEntry, TableEntry};
pub use crate::credentials::{
    CredentialKind, CredentialSelection, CredentialSet, OAuth2Credentials, SessionCredentials,
};
pub use crate::envelope::{
    is_auth_expiry, is_error_status, RequestEcho, ResponseBody, ResponseDetails, ResponseEnvelope,
};
pub use crate::error::RequestError;
pub use crate::extract::{extract_list, Extracted, Extractor};
pub use crate::graphql::{graphql_errors, GraphQlRequest};
pub use crate::headers::{SensitiveHeaders, SESSION_HEADER};
pub use crate::markup::strip_tags;
pub use crate::messages::{
    format_messages, highest_severity, parse_messages, MessageGroup, MessageLevel,
};
pub use crate::query::{ExportFormat, InstanceQuery, QueryAction, RefMode};
pub use crate::request::{build_url, ApiRequest, HttpMethod, RequestBody, RequestOptions};
pub use crate::secret::Secret;
