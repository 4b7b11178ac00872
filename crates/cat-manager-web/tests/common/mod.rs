// crates/cat-manager-web/tests/common/mod.rs
// ============================================================================
// Module: Common Web Test Fixtures
// Description: In-process router fixtures for Cat Manager web tests.
// Purpose: Build a server over a chosen store and capture its responses.
// Dependencies: cat-manager-web, tower, http-body-util
// ============================================================================

//! ## Overview
//! Builds a [`CatManagerServer`] from inline config (optionally adjusted), swaps in the requested
//! feature evaluator and an in-memory audit sink, and drives its router with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::ACCEPT;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::COOKIE;
use cat_manager_config::CatManagerConfig;
use cat_manager_core::FeatureEvaluator;
use cat_manager_core::SharedKittenStore;
use cat_manager_core::UserId;
use cat_manager_core::UserIdentity;
use cat_manager_web::CatManagerServer;
use cat_manager_web::MemoryAuditSink;
use cat_manager_web::SessionAuthenticator;
use http_body_util::BodyExt;
use tower::ServiceExt;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Agencies granted to user 1; agency 77 is never inserted.
const CONFIG: &str = r#"
[server]
bind = "127.0.0.1:0"
max_body_bytes = 1024

[server.audit]
enabled = false

[session]
secret = "0123456789abcdef0123456789abcdef"

[[access.grants]]
user_id = 1
agencies = [2, 77, 2342, 1163552]
"#;

/// Captured HTTP response.
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body as UTF-8 text.
    pub body: String,
}

/// Router plus the handles tests need around it.
pub struct TestApp {
    /// Router under test.
    pub router: Router,
    /// Store backing the router.
    pub store: SharedKittenStore,
    /// Session authenticator sharing the router's secret.
    pub sessions: SessionAuthenticator,
    /// Captured audit events.
    pub audit: Arc<MemoryAuditSink>,
}

/// Returns the shared fixture config for tests that adjust it.
pub fn base_config() -> Result<CatManagerConfig, Box<dyn std::error::Error>> {
    Ok(CatManagerConfig::from_toml_str(CONFIG)?)
}

impl TestApp {
    /// Builds an app using the given feature evaluator.
    pub fn new(features: Arc<dyn FeatureEvaluator>) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_config(&base_config()?, features)
    }

    /// Builds an app from an adjusted config using the given feature evaluator.
    pub fn from_config(
        config: &CatManagerConfig,
        features: Arc<dyn FeatureEvaluator>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let audit = Arc::new(MemoryAuditSink::new());
        let server = CatManagerServer::from_config(config)?
            .with_features(features)
            .with_audit(audit.clone());
        Ok(Self {
            router: server.router(),
            store: server.store(),
            sessions: server.sessions().clone(),
            audit,
        })
    }

    /// Returns a `Cookie` header value for the user.
    pub fn cookie_for(&self, user_id: u64) -> Result<String, Box<dyn std::error::Error>> {
        let identity = UserIdentity::new(UserId::new(user_id)).with_profile(
            "adalovelace",
            "Ada",
            "Lovelace",
            "ada@cats.com",
        );
        Ok(self.sessions.cookie_header(&identity)?)
    }

    /// Issues a GET request.
    pub async fn get(
        &self,
        uri: &str,
        cookie: Option<&str>,
        accept: Option<&str>,
    ) -> Result<TestResponse, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        self.send(builder.body(Body::empty())?).await
    }

    /// Issues a urlencoded form POST.
    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        body: String,
    ) -> Result<TestResponse, Box<dyn std::error::Error>> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body))?).await
    }

    /// Sends a request through the router.
    async fn send(
        &self,
        request: Request<Body>,
    ) -> Result<TestResponse, Box<dyn std::error::Error>> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok(TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }
}
