use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Classifier returned {actual} scores, expected {expected}")]
    InputShape { expected: usize, actual: usize },

    #[error("Score for {emotion} out of range: {value}")]
    Range { emotion: String, value: f64 },

    #[error("Song catalog is empty")]
    EmptyCatalog,

    #[error("Inference provider error: {0}")]
    Provider(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InputShape { .. } | AppError::Range { .. } => {
                tracing::error!("Classifier contract violation: {}", self);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Provider(ref msg) => {
                tracing::error!("Inference provider error: {}", msg);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::EmptyCatalog => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Catalog(ref msg) => {
                tracing::error!("Catalog error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Catalog error".to_string())
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
