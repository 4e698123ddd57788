use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("credential base URL is empty")]
    MissingBaseUrl,
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported HTTP method: {0}")]
    UnknownMethod(String),
    #[error("GraphQL query cannot be empty")]
    EmptyQuery,
    #[error("failed to serialize request body: {0}")]
    Body(#[source] serde_json::Error),
}
