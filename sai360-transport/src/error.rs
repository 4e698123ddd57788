use sai360_core::{RequestError, ResponseEnvelope};

use crate::credentials::CredentialError;
use crate::http::HttpError;
use crate::session::TokenStoreError;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error("operation requires SAI360 Basic Auth (session) credentials")]
    SessionRequired,
    #[error("no OAuth2 sender configured for SAI360 OAuth2 credentials")]
    OAuth2SenderMissing,
    #[error("SAI360 login failed with status {status}: {body}")]
    LoginFailed { status: u16, body: String },
    #[error("SAI360 login returned an unreadable response: {0}")]
    LoginResponse(String),
    #[error("SAI360 login did not return a sessionId or token")]
    MissingSessionToken,
    #[error("SAI360 login retry failed")]
    LoginRetryFailed,
    /// An error status when the caller opted out of status-as-data.
    #[error("{}", .envelope.error_message())]
    Status { envelope: Box<ResponseEnvelope> },
    /// An operation received an error status; `message` may include the server log.
    #[error("{message}")]
    Api {
        message: String,
        envelope: Box<ResponseEnvelope>,
    },
    #[error("unexpected SAI360 response: {0}")]
    UnexpectedResponse(String),
    #[error("GraphQL query returned errors: {0}")]
    GraphQl(String),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl DispatchError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DispatchError::Status { envelope } | DispatchError::Api { envelope, .. } => {
                Some(envelope.status_code())
            }
            DispatchError::LoginFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            DispatchError::Status { envelope } | DispatchError::Api { envelope, .. } => {
                Some(&**envelope)
            }
            _ => None,
        }
    }
}
