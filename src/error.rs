use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VerseError {
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file} must contain a JSON list")]
    NotAList { file: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing or expired session")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Background task failed: {0}")]
    Task(String),
}

impl VerseError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VerseError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn parse(file: impl Into<String>, source: serde_json::Error) -> Self {
        VerseError::Parse {
            file: file.into(),
            source,
        }
    }
}

impl From<figment::Error> for VerseError {
    fn from(e: figment::Error) -> Self {
        VerseError::Configuration(e.to_string())
    }
}

impl From<tokio::task::JoinError> for VerseError {
    fn from(e: tokio::task::JoinError) -> Self {
        VerseError::Task(e.to_string())
    }
}

impl IntoResponse for VerseError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            VerseError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "Login required.".to_string(),
                },
            ),
            VerseError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid username or password.".to_string(),
                },
            ),
            VerseError::Filesystem { .. }
            | VerseError::Parse { .. }
            | VerseError::NotAList { .. }
            | VerseError::Json(_)
            | VerseError::Configuration(_)
            | VerseError::PasswordHash(_)
            | VerseError::Task(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
