//! Adapter error types.

use thiserror::Error;

pub type OAuth2Result<T> = Result<T, OAuth2Error>;

/// Failures of a single login attempt. All variants are fatal to the
/// attempt; retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum OAuth2Error {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The provider endpoint returned a non-success status, or signaled an
    /// error inside an otherwise successful body.
    #[error("upstream endpoint returned {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The subject identifier was absent or empty. The one validation the
    /// adapter always performs.
    #[error("missing subject identifier")]
    MissingIdentifier,

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
