use crate::pipeline::HttpFailure;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The call failed in transport or with a non-2xx status. The failure is
    /// exactly what the pipeline observed, so callers can apply their own
    /// handling on top of the notification already shown.
    #[error("{0}")]
    Http(HttpFailure),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to encode request: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode response: {0}")]
    Decode(serde_json::Error),

    #[error("Request task aborted: {0}")]
    Aborted(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http(failure) => failure.status(),
            _ => None,
        }
    }
}

impl From<HttpFailure> for ApiError {
    fn from(failure: HttpFailure) -> Self {
        ApiError::Http(failure)
    }
}
