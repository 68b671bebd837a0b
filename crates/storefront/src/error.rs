//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Responses are JSON `{"message": ...}` bodies; internal detail is logged,
//! never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthFlowError;
use crate::media::MediaError;
use crate::session_store::SessionStoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store operation failed.
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),

    /// Media host operation failed.
    #[error("Media host error: {0}")]
    Media(#[from] MediaError),

    /// Authentication flow failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthFlowError),

    /// Upload request carried no `image` field.
    #[error("No file uploaded")]
    NoFileUploaded,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Media(_) | Self::SessionStore(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Media(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::SessionStore(err) => match err {
                SessionStoreError::Rejected(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Auth(err) => match err {
                AuthFlowError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthFlowError::Auth(_) | AuthFlowError::AlreadyAuthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                AuthFlowError::InFlight => StatusCode::CONFLICT,
            },
            Self::NoFileUploaded | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Media(_) | Self::Session(_) | Self::Internal(_) => "Server Error".to_string(),
            Self::SessionStore(err) => match err {
                SessionStoreError::Rejected(msg) => msg.clone(),
                _ => "External service error".to_string(),
            },
            Self::NoFileUploaded => "No file uploaded".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
