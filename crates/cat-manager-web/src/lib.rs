// cat-manager-web/src/lib.rs
// ============================================================================
// Module: Cat Manager Web Library
// Description: Public API surface for the Cat Manager HTTP server.
// Purpose: Expose the server, session codec, and audit sinks.
// Dependencies: crate::{audit, auth, error, pages, server, session}
// ============================================================================

//! ## Overview
//! `cat-manager-web` serves the agency kitten pages over HTTP with axum.
//! Requests are authenticated by an HMAC-signed session cookie, authorized by
//! static grants, and rendered as HTML or, on request, as the JSON form of
//! the same view-model.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod error;
pub mod pages;
pub mod server;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::RequestAuditSink;
pub use audit::StderrAuditSink;
pub use auth::AuthError;
pub use auth::SessionAuthenticator;
pub use error::WebError;
pub use server::CatManagerServer;
pub use server::HEALTH_ROUTE;
pub use server::KITTEN_FORM_ROUTE;
pub use server::KITTENS_ROUTE;
pub use server::ServerError;
pub use session::SessionCodec;
pub use session::SessionError;
