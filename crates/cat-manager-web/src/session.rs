// cat-manager-web/src/session.rs
// ============================================================================
// Module: Session Tokens
// Description: HMAC-signed session tokens carrying a user identity.
// Purpose: Encode and verify the value of the session cookie.
// Dependencies: base64, hmac, sha2, serde_json
// ============================================================================

//! ## Overview
//! A token is `base64url(json(identity)) "." base64url(hmac_sha256(payload))`
//! with no padding. [`SessionCodec::encode`] is a pure function of the secret
//! and the identity, so tests can mint cookies without a login flow.
//! Decoding verifies the signature in constant time before the payload is
//! parsed, then rejects expired identities.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cat_manager_core::UserIdentity;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted token length in bytes.
pub const MAX_TOKEN_BYTES: usize = 4096;

/// HMAC-SHA256 keyed hash.
type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session token errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Token structure or encoding is invalid.
    #[error("malformed session token: {0}")]
    Malformed(String),
    /// Signature does not match the payload.
    #[error("session signature mismatch")]
    BadSignature,
    /// Identity carries an expiry in the past.
    #[error("session expired")]
    Expired,
    /// Identity could not be serialized.
    #[error("session encoding failed: {0}")]
    Encoding(String),
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionCodec {
    /// HMAC key.
    secret: Vec<u8>,
}

impl SessionCodec {
    /// Creates a codec for the secret.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Encodes and signs an identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Encoding`] when the identity cannot be
    /// serialized.
    pub fn encode(&self, identity: &UserIdentity) -> Result<String, SessionError> {
        let json =
            serde_json::to_vec(identity).map_err(|err| SessionError::Encoding(err.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let tag = self.mac(payload.as_bytes())?.finalize().into_bytes();
        let signature = URL_SAFE_NO_PAD.encode(tag);
        Ok(format!("{payload}.{signature}"))
    }

    /// Verifies a token and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the token is malformed, the signature
    /// does not match, or the identity expired at `now` (unix seconds).
    pub fn decode(&self, token: &str, now: u64) -> Result<UserIdentity, SessionError> {
        if token.len() > MAX_TOKEN_BYTES {
            return Err(SessionError::Malformed("token too large".to_string()));
        }
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| SessionError::Malformed("missing signature".to_string()))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::Malformed("signature is not base64url".to_string()))?;
        self.mac(payload.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;
        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed("payload is not base64url".to_string()))?;
        let identity: UserIdentity = serde_json::from_slice(&json)
            .map_err(|err| SessionError::Malformed(err.to_string()))?;
        if identity.is_expired(now) {
            return Err(SessionError::Expired);
        }
        Ok(identity)
    }

    /// Returns a keyed MAC primed with the message.
    fn mac(&self, message: &[u8]) -> Result<HmacSha256, SessionError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| SessionError::Encoding("invalid session key".to_string()))?;
        mac.update(message);
        Ok(mac)
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
