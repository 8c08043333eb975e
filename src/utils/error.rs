use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Invalid book id '{value}': {reason}")]
    InvalidId { value: String, reason: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Book {id} not found")]
    NotFound { id: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl BookError {
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        BookError::StoreUnavailable {
            message: message.into(),
        }
    }

    /// HTTP status reported to callers of the books API.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookError::InvalidId { .. } | BookError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            BookError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<mongodb::error::Error> for BookError {
    fn from(err: mongodb::error::Error) -> Self {
        BookError::StoreUnavailable {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for BookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BookError>;
