#![forbid(unsafe_code)]

//! Authenticated transport for the SAI360 GRC REST/GraphQL API.
//!
//! [`Dispatcher`] resolves which credential kind applies, attaches the right
//! authentication, and returns every outcome as a
//! [`ResponseEnvelope`](sai360_core::ResponseEnvelope). [`Operations`] wraps it
//! with the typed table, datastore, GraphQL and session calls.

pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod operations;
pub mod session;

pub use crate::config::{ConfigError, ConfigFormat, DispatcherConfig};
pub use crate::credentials::{
    resolve_credentials, CredentialError, CredentialStore, EnvCredentialStore,
    FileCredentialStore, StaticCredentialStore,
};
pub use crate::dispatcher::{
    login, AuthenticatedSender, Dispatcher, DispatcherBuilder, LoginResponse, StaticBearerSender,
};
pub use crate::error::DispatchError;
pub use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use crate::operations::{GraphQlOptions, Operations, QueryOutcome, SaveOutcome, XmlExport};
pub use crate::session::{MemoryTokenStore, SessionToken, TokenStore, TokenStoreError};
