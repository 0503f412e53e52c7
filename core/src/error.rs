//! Error types for the Egnyte client.
//!
//! # Design
//! HTTP statuses >= 400 are not errors at this layer: they come back as a
//! normal `Response` and the caller decides. `Error::Api` only appears when
//! the caller opts in through `Response::into_result`. Transport failures
//! (DNS, refused connections, TLS) are carried unchanged in
//! `Error::Transport`.

use thiserror::Error;

use crate::response::ErrorDetails;

/// Result type alias for egnyte-core
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration, raised at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// The computed or overridden base URL is not a valid absolute URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP exchange itself failed
    #[error("HTTP transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// Payload serialization or response body decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a failure status
    #[error("API error {}: {}", .0.status.code, .0.status.text)]
    Api(Box<ErrorDetails>),

    /// Error details were requested for a successful response
    #[error("Request was successful (HTTP {0}), there are no error details")]
    NoErrorDetails(u16),
}

impl Error {
    /// Status code of an `Api` error, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(details) => Some(details.status.code),
            _ => None,
        }
    }
}
