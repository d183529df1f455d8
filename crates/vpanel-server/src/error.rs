//! HTTP error type.
//!
//! Store and domain failures surface at the action boundary as a rendered
//! error page — the administrative surface is a browser, so a JSON error
//! body would just be an unreadable wall of text. Validation failures stay
//! plain-text with their fixed status.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use vpanel_core::{TrialError, UserError};
use vpanel_store::StoreError;

use crate::render;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request is missing or malformed in a required field.
    #[error("{0}")]
    BadRequest(String),

    /// A store or domain operation failed mid-action.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page(&message)),
            )
                .into_response(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TrialError> for AppError {
    fn from(err: TrialError) -> Self {
        // AlreadyUsed is handled where the trial flow can render its own
        // page; reaching this conversion means an action path hit it
        // unexpectedly, and the generic page is the right fallback.
        Self::Internal(err.to_string())
    }
}
