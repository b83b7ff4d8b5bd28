//! Unified error handling for the dashboard.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dukkan_core::delivery::{QuoteError, ZoneValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A zone edit was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ZoneValidationError),

    /// A customer asked about a city the store does not serve.
    #[error("{0}")]
    Quote(#[from] QuoteError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) | Self::Quote(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Validation(e) => ErrorBody {
                error: e.to_string(),
                field: Some(e.field()),
                code: Some(e.code()),
            },
            Self::Database(RepositoryError::NotFound) => ErrorBody {
                error: "Store not found".to_string(),
                field: None,
                code: None,
            },
            _ if self.is_server_error() => ErrorBody {
                error: "Internal server error".to_string(),
                field: None,
                code: None,
            },
            _ => ErrorBody {
                error: self.to_string(),
                field: None,
                code: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
