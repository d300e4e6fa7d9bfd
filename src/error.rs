//! Error types for the Submission Box server

use std::path::PathBuf;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Unreadable multipart request: {0}")]
    MultipartRequest(#[from] MultipartRejection),

    #[error("Unreadable form: {0}")]
    Form(#[from] FormRejection),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Submission log error: {0}")]
    Log(#[from] LogError),
}

/// Rejected form input. Recovered at the handler boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing student id")]
    MissingStudentId,

    #[error("malformed student id")]
    MalformedStudentId,

    #[error("missing file part")]
    MissingFilePart,

    #[error("no file selected")]
    NoFileSelected,
}

impl ValidationError {
    /// Text shown to the user on the next form render
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingStudentId => "No student ID",
            Self::MalformedStudentId => "Student ID is not an 11-digit number",
            Self::MissingFilePart => "No file part",
            Self::NoFileSelected => "No selected file",
        }
    }
}

/// Filesystem failures while storing a submission
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read back {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Submission log sink failures
#[derive(Error, Debug)]
pub enum LogError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to append record: {0}")]
    Append(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Multipart(e) => {
                tracing::warn!("Rejected upload body: {}", e);
                // 413 when the body limit was hit, 400 for anything else
                (e.status(), "bad_upload", e.body_text())
            }
            AppError::MultipartRequest(e) => {
                tracing::warn!("Rejected multipart request: {}", e);
                (e.status(), "bad_upload", e.body_text())
            }
            AppError::Form(e) => {
                tracing::warn!("Rejected form body: {}", e);
                (e.status(), "bad_form", e.body_text())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Storage error".to_string(),
                )
            }
            AppError::Log(e) => {
                tracing::error!("Submission log error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "log_error",
                    "Submission log error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_type.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
