//! Mapping of service failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contacts::{ContactError, ErrorKind};
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    Contact(ContactError),
    BadRequest(String),
    /// Request body refused before reaching the service, with the status
    /// the extractor chose (413 for an oversized upload).
    Rejected(StatusCode, String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        Self::Contact(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Contact(err) => {
                let kind = err.kind();
                let status = match kind {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::PersistenceFailure | ErrorKind::UploadFailure => {
                        error!(error = ?err, "contact operation failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, kind.as_str(), err.to_string())
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::Rejected(status, message) => {
                let code = match status {
                    StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
                    s if s.is_server_error() => "internal",
                    _ => "bad_request",
                };
                (status, code, message)
            }
            ApiError::Internal(message) => {
                error!(message = %message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        };
        (
            status,
            Json(ErrorBody {
                error: code,
                message,
            }),
        )
            .into_response()
    }
}
