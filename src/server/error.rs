//! HTTP error responses

use crate::error::ResumeAnalyzerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

/// Wraps the crate error so handlers can return `Result<T, ApiError>`.
/// Bodies look like `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug)]
pub struct ApiError(pub ResumeAnalyzerError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(ResumeAnalyzerError::InvalidInput(message.into()))
    }
}

impl<E> From<E> for ApiError
where
    E: Into<ResumeAnalyzerError>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            ResumeAnalyzerError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ResumeAnalyzerError::UnsupportedFormat(msg) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT", msg.clone())
            }
            ResumeAnalyzerError::PdfExtraction(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED", msg.clone())
            }
            ResumeAnalyzerError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ResumeAnalyzerError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ResumeAnalyzerError::Llm(e) => {
                error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            ResumeAnalyzerError::Database(e) => {
                error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            other => {
                error!("Internal error: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::bad_request("empty"), StatusCode::BAD_REQUEST),
            (ApiError(ResumeAnalyzerError::UnsupportedFormat("docx".into())), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ApiError(ResumeAnalyzerError::PdfExtraction("broken".into())), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError(ResumeAnalyzerError::NotFound("resume".into())), StatusCode::NOT_FOUND),
            (ApiError(ResumeAnalyzerError::Conflict("email".into())), StatusCode::CONFLICT),
            (ApiError(ResumeAnalyzerError::AnalysisFailed("boom".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
