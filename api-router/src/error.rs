use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::AppError;
use document_pipeline::DocumentError;
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced to clients. `Reported` is an expected outcome that the
/// client reads from a 200 body; `InternalError` is a 500.
#[derive(Error, Debug, Serialize, Clone)]
pub enum ApiError {
    #[error("{0}")]
    Reported(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn reported(message: impl Display) -> Self {
        Self::Reported(message.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(msg) | AppError::Validation(msg) => Self::Reported(msg),
            AppError::Document(msg) => {
                tracing::error!("Document error: {}", msg);
                Self::InternalError(msg)
            }
            other => {
                tracing::error!("Internal error: {:?}", other);
                Self::InternalError(other.to_string())
            }
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        AppError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Reported(message) => (StatusCode::OK, message),
            Self::InternalError(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (
            status,
            Json(ErrorResponse {
                status: "error".to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    status: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fmt::Debug;

    fn assert_status_code<T: IntoResponse + Debug>(response: T, expected_status: StatusCode) {
        let response = response.into_response();
        assert_eq!(response.status(), expected_status);
    }

    #[test]
    fn test_app_error_to_api_error_conversion() {
        let not_found = AppError::NotFound("Bot replies JSON file not found at /x".to_string());
        assert!(matches!(
            ApiError::from(not_found),
            ApiError::Reported(msg) if msg == "Bot replies JSON file not found at /x"
        ));

        let validation = AppError::Validation("invalid input".to_string());
        assert!(matches!(ApiError::from(validation), ApiError::Reported(msg) if msg == "invalid input"));

        let document = AppError::Document("No tables found in Word document".to_string());
        assert!(matches!(
            ApiError::from(document),
            ApiError::InternalError(msg) if msg == "No tables found in Word document"
        ));

        let io = AppError::Io(std::io::Error::other("disk gone"));
        assert!(matches!(ApiError::from(io), ApiError::InternalError(msg) if msg == "IoError: disk gone"));
    }

    #[test]
    fn test_document_error_conversion() {
        assert!(matches!(
            ApiError::from(DocumentError::NoTables),
            ApiError::InternalError(msg) if msg == "No tables found in Word document"
        ));
    }

    #[test]
    fn test_api_error_response_status_codes() {
        assert_status_code(ApiError::reported("missing"), StatusCode::OK);
        assert_status_code(
            ApiError::InternalError("server error".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::reported("Local file not found: /a.docx").into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Local file not found: /a.docx"})
        );
    }
}
