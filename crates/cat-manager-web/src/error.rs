// cat-manager-web/src/error.rs
// ============================================================================
// Module: Web Errors
// Description: Request-level errors and their HTTP mapping.
// Purpose: Convert domain failures into status codes and small error pages.
// Dependencies: axum, thiserror
// ============================================================================

//! ## Overview
//! Each [`WebError`] variant owns one status code. Responses carry a fixed
//! public message per variant; detail strings stay in the error value and
//! never reach the client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use cat_manager_core::AccessError;
use cat_manager_core::StoreError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::pages::render_error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request handling errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebError {
    /// Missing or invalid session.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Authenticated user lacks a grant.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Target resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Request input is invalid.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Request conflicts with existing data.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Request body exceeds the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,
    /// Unexpected server failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the audit outcome label.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns the message shown to clients.
    const fn public_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "Sign in to continue.",
            Self::Forbidden(_) => "You do not have access to this agency.",
            Self::NotFound(_) => "The requested agency does not exist.",
            Self::BadRequest(_) => "The request could not be processed.",
            Self::Conflict(_) => "A kitten with that id already exists.",
            Self::PayloadTooLarge => "The request body is too large.",
            Self::Internal(_) => "Something went wrong.",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        match render_error(status.as_u16(), reason, self.public_message()) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], reason.to_string())
                .into_response(),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(error: AuthError) -> Self {
        Self::Unauthenticated(error.to_string())
    }
}

impl From<AccessError> for WebError {
    fn from(error: AccessError) -> Self {
        Self::Forbidden(error.to_string())
    }
}

impl From<StoreError> for WebError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Invalid(message) => Self::BadRequest(message),
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<askama::Error> for WebError {
    fn from(error: askama::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
