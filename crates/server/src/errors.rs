use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use noterag::{ingest::IngestError, RagError};
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Every failure a handler can hit is converted into one of these variants,
/// which in turn decides the HTTP status and the `{"error": ...}` body.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `noterag` pipeline.
    Rag(RagError),
    /// Errors raised while loading the knowledge base.
    Ingest(IngestError),
    /// The request body could not be parsed.
    BadRequest(String),
    /// The server lacks a component needed for the request.
    Unavailable(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        AppError::Rag(err)
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

fn rag_error_response(err: RagError) -> (StatusCode, String) {
    match err {
        RagError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        e if e.is_upstream() => (StatusCode::BAD_GATEWAY, e.to_string()),
        RagError::MissingAiProvider => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server is not configured correctly.".to_string(),
        ),
        e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Rag(err) => {
                error!("RagError: {:?}", err);
                rag_error_response(err)
            }
            AppError::Ingest(err) => {
                error!("IngestError: {:?}", err);
                match err {
                    IngestError::Store(e) => rag_error_response(e),
                    IngestError::SourceNotFound(msg) => (StatusCode::NOT_FOUND, msg),
                    e @ (IngestError::Fetch(_) | IngestError::Parse(_)) => {
                        (StatusCode::BAD_GATEWAY, e.to_string())
                    }
                }
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
