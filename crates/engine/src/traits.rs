use crate::query::DeckQuery;
use crate::types::{ErrorCode, ErrorInfo};
use serde_json::Value;

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, reset mid-body, ...
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status code {status}")]
    Status { status: u16, body: Value },

    #[error("{0}")]
    Other(String),
}

impl ApiError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::Network(_) => ErrorCode::NetworkError,
            ApiError::Status { .. } => ErrorCode::HttpStatus,
            ApiError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// The single serialized shape every failure is displayed as.
    pub fn to_error_info(&self) -> ErrorInfo {
        let details = match self {
            ApiError::Status { status, body } => serde_json::json!({
                "status": status,
                "body": body,
            }),
            _ => Value::Null,
        };
        ErrorInfo {
            code: self.error_code(),
            message: self.to_string(),
            details,
        }
    }
}

// ---------------------------------------------------------------------------
// Card Games Engine API
// ---------------------------------------------------------------------------

/// The three backend operations the harness exercises.
///
/// Bodies are opaque: implementations hand back whatever JSON the backend
/// produced without looking at its shape.
#[async_trait::async_trait]
pub trait DeckApi: Send + Sync {
    /// `POST /create` with optional `cards`, `shuffled`, `count`.
    async fn create(&self, query: &DeckQuery) -> ApiResult<Value>;

    /// `GET /open/{guid}`.
    async fn open(&self, guid: &str) -> ApiResult<Value>;

    /// `PATCH /draw/{guid}` with the same optional parameters as create.
    async fn draw(&self, guid: &str, query: &DeckQuery) -> ApiResult<Value>;
}
