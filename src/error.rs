use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Video catalog unavailable (check API key and quota): {0}")]
    CatalogUnavailable(String),

    #[error("Video catalog request failed: {0}")]
    CatalogRequest(String),

    #[error("No matching videos found, try adjusting your moods or duration")]
    NoCandidates,

    #[error("Ranking service returned an invalid response: {0}")]
    OracleResponseInvalid(String),

    #[error("Ranking service request failed: {0}")]
    OracleRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid video id: {0}")]
    InvalidIdentity(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::CatalogUnavailable(_) => "catalog_unavailable",
            AppError::CatalogRequest(_) => "catalog_request_error",
            AppError::NoCandidates => "no_candidates",
            AppError::OracleResponseInvalid(_) => "oracle_response_invalid",
            AppError::OracleRequest(_) => "oracle_request_error",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidIdentity(_) => "invalid_identity",
            AppError::Cache(_) => "cache_error",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoCandidates => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CatalogRequest(_)
            | AppError::OracleRequest(_)
            | AppError::OracleResponseInvalid(_) => StatusCode::BAD_GATEWAY,
            AppError::Cache(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

/// Malformed request bodies are input errors, not axum's plain-text 422
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
