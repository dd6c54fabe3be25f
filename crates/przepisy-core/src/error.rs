//! Gateway Errors
//!
//! Every failure the API can produce, plus the message shown to the user.

use thiserror::Error;

/// Shown when the server answered with a body we could not parse.
pub const UNEXPECTED_SERVER_ERROR: &str = "Unexpected server error";
/// Shown when the server's error body carried no `detail`.
pub const REQUEST_FAILED: &str = "Request failed";
/// Shown when the request never reached the server.
pub const CONNECTION_FAILED: &str = "Błąd połączenia z serwerem";

/// Common result type for gateway operations
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 404 from the server. Terminal for a page, never retried.
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-2xx answer, with the server's `detail` text.
    #[error("server error {status}: {detail}")]
    Server { status: u16, detail: String },
    /// The request did not complete (offline, timeout, aborted).
    #[error("transport error: {0}")]
    Transport(String),
    /// A 2xx answer whose body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the UI: the server's message verbatim where there is one.
    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound(detail) | ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Transport(_) => CONNECTION_FAILED.to_string(),
            ApiError::Decode(_) => UNEXPECTED_SERVER_ERROR.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Build the error for a non-2xx status from its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("detail")
                .and_then(|d| d.as_str())
                .filter(|d| !d.is_empty())
                .unwrap_or(REQUEST_FAILED)
                .to_string(),
            Err(_) => UNEXPECTED_SERVER_ERROR.to_string(),
        };
        if status == 404 {
            ApiError::NotFound(detail)
        } else {
            ApiError::Server { status, detail }
        }
    }
}
