//! Error types for provider calls and the refresh scheduler.

use thiserror::Error;

/// Errors that can occur while fetching one category from a provider.
///
/// None of these escape the aggregate fetch: the category that failed
/// contributes zero articles and the error is logged.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Body decoded but lacked the provider's success indicator
    #[error("provider rejected request (status `{status}`): {message}")]
    Rejected {
        /// Provider-level status string, e.g. `"error"`
        status: String,
        /// Provider error message, if any
        message: String,
    },

    /// Body was not the expected JSON shape
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from starting or stopping the refresh scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
}
