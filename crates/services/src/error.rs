//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::AggregationError;

/// Errors emitted by a `BookmarkService`.
///
/// The toggle engine only distinguishes success from failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BookmarkServiceError {
    #[error("bookmark request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("bookmark service unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted while loading the progress dashboard.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("progress request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error("progress source failed: {0}")]
    Source(String),
}

/// Errors emitted while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not set")]
    Missing { var: &'static str },
    #[error("invalid {var} value `{raw}`: {source}")]
    InvalidUrl {
        var: &'static str,
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid {var} value `{raw}`")]
    InvalidNumber { var: &'static str, raw: String },
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}
