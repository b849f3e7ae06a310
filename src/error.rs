use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

const UNIQUE_VIOLATION: &str = "23505";

/// Maps a unique index hit to a validation failure; any other SQLSTATE is a fault.
fn unique_violation(code: Option<&str>, constraint: Option<&str>) -> Option<AppError> {
    if code != Some(UNIQUE_VIOLATION) {
        return None;
    }
    let msg = match constraint {
        Some("users_email_key") => "email already registered".to_string(),
        Some("users_login_key") => "login already taken".to_string(),
        other => format!("duplicate value violates {}", other.unwrap_or("record")),
    };
    Some(AppError::Validation(msg))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if let Some(mapped) = unique_violation(db_err.code().as_deref(), db_err.constraint()) {
                return mapped;
            }
        }
        AppError::Database(e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(msg) | AppError::Unauthorized(msg) | AppError::Validation(msg) => {
                json!({ "message": msg })
            }
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %self, "request failed");
                json!({ "message": "Server error", "error": self.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
