#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend-reported failure, already normalized to a display message.
    #[error("{0}")]
    Api(String),

    /// Client-side validation failure. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// The operation requires a signed-in session.
    #[error("Not signed in")]
    Unauthorized,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Collapse transport-level failures into the operation's default
    /// message. Backend-reported and validation errors pass through
    /// untouched; everything else is logged and then presented the same
    /// way a structured backend failure would be.
    pub fn with_default(self, default: &str) -> ApiError {
        match self {
            ApiError::Api(_) | ApiError::Validation(_) | ApiError::Unauthorized => self,
            other => {
                tracing::error!("request failed: {}", other);
                ApiError::Api(default.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
