//! Errors raised at the content repository boundary

use thiserror::Error;

/// A page fetch that did not produce a usable response
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body decode failure
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    /// The repository answered with a non-success status
    #[error("repository answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Errors raised by document lookups
#[derive(Debug, Error)]
pub enum CmsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// No document exists behind the requested uid
    #[error("no document found for uid {uid:?}")]
    ContentNotFound { uid: String },
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        CmsError::Fetch(FetchError::Request(err))
    }
}
