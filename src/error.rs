//! Error types shared across the crate.
//!
//! The collection store branches on the error class: a `Connectivity` failure
//! keeps the stale cache around, while a `Request` failure during a refresh
//! clears it. `Validation` errors are raised locally, before any network call
//! is attempted.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (timeout, DNS or connection failure).
    /// Previously cached data is still considered usable.
    #[error("unable to reach the expense service: {0}")]
    Connectivity(String),

    /// The service responded with an error status. The message is taken from
    /// the response body when one was provided.
    #[error("the expense service returned an error ({status}): {message}")]
    Request { status: u16, message: String },

    /// Local input validation failed; nothing was sent over the network.
    #[error("invalid expense: {0}")]
    Validation(String),

    /// Problems with the configuration file or its contents.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure means the service could not be reached at all,
    /// as opposed to the service rejecting the request.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity(_))
    }
}
