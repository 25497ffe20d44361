use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::domain::error::DomainError;

/// Ошибка HTTP-слоя. Её `IntoResponse` единственное место, где сбой
/// превращается в ответ: статус + `{"error": "..."}`.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("invalid token")]
    InvalidToken,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub(crate) fn status(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Status {
            status,
            message: message.into(),
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(err) => match err {
                DomainError::InvalidId(_) => (StatusCode::BAD_REQUEST, "Invalid id".to_string()),
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::DuplicateKey(_) => {
                    (StatusCode::CONFLICT, "Duplicate key error".to_string())
                }
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
                DomainError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                DomainError::Unexpected(message) => internal(message),
            },
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, validation_message(errors)),
            AppError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Status { status, message } => (*status, message.clone()),
            AppError::Internal(err) => internal(&err.to_string()),
        }
    }
}

/// Сообщение сбоя уходит клиенту как есть; пустое заменяется общим.
fn internal(message: &str) -> (StatusCode, String) {
    let message = message.trim();
    let message = if message.is_empty() {
        "Internal Server Error"
    } else {
        message
    };
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    messages.sort();
    messages.dedup();

    if messages.is_empty() {
        return "Validation error".to_string();
    }
    messages.join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();

        if status.is_server_error() {
            error!(status = %status, error = ?self, "request failed");
        } else {
            warn!(status = %status, error = %self, "request rejected");
        }

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}
