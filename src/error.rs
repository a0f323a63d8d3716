use thiserror::Error;

/// Transport-level outcome of a backend call.
///
/// Anything the backend rejected with a readable message is `Rejected` and
/// carries that message verbatim; `Unauthorized` is kept separate because a
/// 401 invalidates the whole session rather than a single operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The backend's own message for business-rule rejections, when present.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
