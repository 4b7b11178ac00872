// cat-manager-web/src/auth.rs
// ============================================================================
// Module: Cookie Authentication
// Description: Session cookie lookup and verification for HTTP requests.
// Purpose: Resolve the requesting user from the `Cookie` header.
// Dependencies: axum, cookie, cat-manager-config
// ============================================================================

//! ## Overview
//! [`SessionAuthenticator`] pairs a [`SessionCodec`] with the configured cookie
//! name. Requests without the cookie, or with a cookie that fails
//! verification, are unauthenticated. Unrelated cookies are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use cat_manager_config::SessionConfig;
use cat_manager_core::UserIdentity;
use cookie::Cookie;
use thiserror::Error;

use crate::session::SessionCodec;
use crate::session::SessionError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No session cookie was presented.
    #[error("missing session cookie")]
    MissingSession,
    /// The session cookie failed verification.
    #[error("invalid session cookie: {0}")]
    InvalidSession(#[from] SessionError),
}

// ============================================================================
// SECTION: Authenticator
// ============================================================================

/// Verifies session cookies on incoming requests.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    /// Token codec.
    codec: SessionCodec,
    /// Session cookie name.
    cookie_name: String,
}

impl SessionAuthenticator {
    /// Creates an authenticator for a secret and cookie name.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>, cookie_name: impl Into<String>) -> Self {
        Self {
            codec: SessionCodec::new(secret),
            cookie_name: cookie_name.into(),
        }
    }

    /// Builds an authenticator from session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.cookie_name.clone())
    }

    /// Returns the session cookie name.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Returns the underlying codec.
    #[must_use]
    pub const fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Returns a `Cookie` header value carrying a signed session for the
    /// identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the identity cannot be encoded.
    pub fn cookie_header(&self, identity: &UserIdentity) -> Result<String, SessionError> {
        let token = self.codec.encode(identity)?;
        Ok(Cookie::new(self.cookie_name.clone(), token).to_string())
    }

    /// Resolves the identity from request headers at `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the cookie is absent or invalid.
    pub fn authenticate(&self, headers: &HeaderMap, now: u64) -> Result<UserIdentity, AuthError> {
        let token = self.session_token(headers).ok_or(AuthError::MissingSession)?;
        Ok(self.codec.decode(&token, now)?)
    }

    /// Finds the session cookie value across all `Cookie` headers.
    fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.cookie_name)
            .map(|cookie| cookie.value().to_string())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
