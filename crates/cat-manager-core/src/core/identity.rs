// cat-manager-core/src/core/identity.rs
// ============================================================================
// Module: User Identity
// Description: Structured identity carried inside session cookies.
// Purpose: Describe who is making a request independent of cookie encoding.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`UserIdentity`] is the payload a session token signs. Only `user_id`
//! is required; profile fields default to empty strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Identity and profile fields for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// User identifier.
    pub user_id: UserId,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Optional expiry as unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl UserIdentity {
    /// Creates an identity with only a user id.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            expires_at: None,
        }
    }

    /// Sets the profile fields.
    #[must_use]
    pub fn with_profile(
        mut self,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self.email = email.into();
        self
    }

    /// Sets an expiry timestamp in unix seconds.
    #[must_use]
    pub const fn expiring_at(mut self, unix_seconds: u64) -> Self {
        self.expires_at = Some(unix_seconds);
        self
    }

    /// Returns true when the identity has expired at `now` (unix seconds).
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Returns a display label for page headers.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() { format!("user {}", self.user_id) } else { full.to_string() }
    }
}
