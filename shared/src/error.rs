use serde::{Serialize, Deserialize};
use thiserror::Error;

pub const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Session expired or invalid")]
    Unauthorized,
    #[error("Server rejected the request with status {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Maps a non-2xx HTTP status onto the error taxonomy.
    pub fn from_status(status: u16) -> Self {
        if status == STATUS_UNAUTHORIZED {
            ApiError::Unauthorized
        } else {
            ApiError::Status(status)
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Error body returned by the API, e.g. `{"detail": "Incorrect username or password"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

pub type Result<T> = std::result::Result<T, ApiError>;
