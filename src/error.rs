use reqwest::StatusCode;
use thiserror::Error;

/// Ways a country lookup can fail.
///
/// The user sees the same notice for every variant; the distinction only reaches the log.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The API answered 404, which is how it says "no country matches".
    #[error("no country matches '{0}'")]
    NotFound(String),

    /// Any other non-success status.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] std::io::Error),

    #[error("malformed country data: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound(_))
    }
}
