// cat-manager-web/src/server.rs
// ============================================================================
// Module: Cat Manager Server
// Description: axum router, request handlers, and server lifecycle.
// Purpose: Serve the agency kitten pages behind session auth and access grants.
// Dependencies: axum, tokio, cat-manager-{core, config, store-sqlite}
// ============================================================================

//! ## Overview
//! Every agency route checks in a fixed order: authenticate the session
//! cookie (401), parse the agency id (400), authorize the grant (403), then
//! load the agency (404). Authorization precedes the lookup so agency
//! existence is not revealed to users without a grant. Store calls run on the
//! blocking pool. The feature evaluator, store, and audit sink are owned by
//! the server instance and can be replaced before serving.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Form;
use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::ACCEPT;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum::routing::get;
use cat_manager_config::CatManagerConfig;
use cat_manager_core::AccessPolicy;
use cat_manager_core::Agency;
use cat_manager_core::AgencyId;
use cat_manager_core::FeatureEvaluator;
use cat_manager_core::InMemoryKittenStore;
use cat_manager_core::KittenFormView;
use cat_manager_core::KittenListView;
use cat_manager_core::KittenStore;
use cat_manager_core::NewKitten;
use cat_manager_core::SharedKittenStore;
use cat_manager_core::StoreError;
use cat_manager_core::UserId;
use cat_manager_core::UserIdentity;
use cat_manager_store_sqlite::SqliteKittenStore;
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditParams;
use crate::audit::RequestAuditSink;
use crate::audit::StderrAuditSink;
use crate::auth::SessionAuthenticator;
use crate::error::WebError;
use crate::pages::render_kitten_form;
use crate::pages::render_kitten_list;

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Kitten list route.
pub const KITTENS_ROUTE: &str = "/cat-manager/{agency_id}/kittens";
/// Add-kitten form route.
pub const KITTEN_FORM_ROUTE: &str = "/cat-manager/{agency_id}/kitten-form";
/// Readiness probe route.
pub const HEALTH_ROUTE: &str = "/healthz";

// ============================================================================
// SECTION: Server
// ============================================================================

/// Cat Manager HTTP server.
pub struct CatManagerServer {
    /// Address to bind when serving.
    bind: SocketAddr,
    /// Maximum accepted request body size.
    max_body_bytes: usize,
    /// Kitten store.
    store: SharedKittenStore,
    /// Feature evaluator passed into page rendering.
    features: Arc<dyn FeatureEvaluator>,
    /// Static access grants.
    access: AccessPolicy,
    /// Session cookie verification.
    sessions: SessionAuthenticator,
    /// Request audit sink.
    audit: Arc<dyn RequestAuditSink>,
}

impl CatManagerServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the config is invalid or the store or
    /// audit sink cannot be opened.
    pub fn from_config(config: &CatManagerConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_store(config)?;
        let audit = build_audit_sink(config)?;
        Ok(Self {
            bind,
            max_body_bytes: config.server.max_body_bytes,
            store,
            features: Arc::new(config.features.evaluator()),
            access: config.access.policy(),
            sessions: SessionAuthenticator::from_config(&config.session),
            audit,
        })
    }

    /// Replaces the kitten store.
    #[must_use]
    pub fn with_store(mut self, store: SharedKittenStore) -> Self {
        self.store = store;
        self
    }

    /// Replaces the feature evaluator.
    #[must_use]
    pub fn with_features(mut self, features: Arc<dyn FeatureEvaluator>) -> Self {
        self.features = features;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn RequestAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns a handle to the kitten store.
    #[must_use]
    pub fn store(&self) -> SharedKittenStore {
        self.store.clone()
    }

    /// Returns the session authenticator.
    #[must_use]
    pub const fn sessions(&self) -> &SessionAuthenticator {
        &self.sessions
    }

    /// Returns the configured bind address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Builds the axum router.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            store: self.store.clone(),
            features: Arc::clone(&self.features),
            access: self.access.clone(),
            sessions: self.sessions.clone(),
            audit: Arc::clone(&self.audit),
        });
        Router::new()
            .route(KITTENS_ROUTE, get(list_kittens))
            .route(KITTEN_FORM_ROUTE, get(show_kitten_form).post(create_kitten))
            .route(HEALTH_ROUTE, get(health))
            .layer(DefaultBodyLimit::max(self.max_body_bytes))
            .with_state(state)
    }

    /// Binds the configured address and serves requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_listener(listener).await
    }

    /// Serves requests on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when serving fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the kitten store from configuration.
fn build_store(config: &CatManagerConfig) -> Result<SharedKittenStore, ServerError> {
    let sqlite = config.store.sqlite_config().map_err(|err| ServerError::Config(err.to_string()))?;
    let store = match sqlite {
        Some(sqlite) => {
            let store =
                SqliteKittenStore::new(&sqlite).map_err(|err| ServerError::Init(err.to_string()))?;
            SharedKittenStore::from_store(store)
        }
        None => SharedKittenStore::from_store(InMemoryKittenStore::new()),
    };
    Ok(store)
}

/// Builds the audit sink from configuration.
fn build_audit_sink(config: &CatManagerConfig) -> Result<Arc<dyn RequestAuditSink>, ServerError> {
    let audit = &config.server.audit;
    if !audit.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &audit.path {
        Some(path) => {
            let sink = FileAuditSink::new(path)
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Request State
// ============================================================================

/// Shared state for request handlers.
struct AppState {
    /// Kitten store.
    store: SharedKittenStore,
    /// Feature evaluator.
    features: Arc<dyn FeatureEvaluator>,
    /// Access grants.
    access: AccessPolicy,
    /// Session verification.
    sessions: SessionAuthenticator,
    /// Request audit sink.
    audit: Arc<dyn RequestAuditSink>,
}

/// Audit fields gathered while a request is handled.
struct RequestScope {
    /// HTTP method.
    method: Method,
    /// Route template.
    route: &'static str,
    /// Agency id once parsed.
    agency_id: Option<AgencyId>,
    /// User id once authenticated.
    user_id: Option<UserId>,
}

impl RequestScope {
    /// Starts a scope for a route.
    const fn new(method: Method, route: &'static str) -> Self {
        Self {
            method,
            route,
            agency_id: None,
            user_id: None,
        }
    }
}

/// Authorized access to one existing agency.
struct AgencyAccess {
    /// Verified identity.
    identity: UserIdentity,
    /// Loaded agency.
    agency: Agency,
}

impl AppState {
    /// Runs the authenticate, parse, authorize, load sequence.
    async fn agency_access(
        &self,
        headers: &HeaderMap,
        raw_agency_id: &str,
        scope: &mut RequestScope,
    ) -> Result<AgencyAccess, WebError> {
        let identity = self.sessions.authenticate(headers, now_unix_seconds())?;
        scope.user_id = Some(identity.user_id);
        let agency_id: AgencyId = raw_agency_id
            .parse()
            .map_err(|_| WebError::BadRequest(format!("invalid agency id: {raw_agency_id}")))?;
        scope.agency_id = Some(agency_id);
        self.access.authorize(identity.user_id, agency_id)?;
        let agency = run_store(&self.store, move |store| store.agency(agency_id))
            .await?
            .ok_or_else(|| WebError::NotFound(format!("agency {agency_id}")))?;
        Ok(AgencyAccess {
            identity,
            agency,
        })
    }

    /// Records the audit event for a finished request and returns the
    /// response.
    fn finish(&self, scope: RequestScope, result: Result<Response, WebError>) -> Response {
        let (response, outcome) = match result {
            Ok(response) => (response, "ok"),
            Err(error) => {
                let outcome = error.outcome();
                (error.into_response(), outcome)
            }
        };
        self.audit.record(&RequestAuditEvent::new(RequestAuditParams {
            method: scope.method.to_string(),
            route: scope.route,
            agency_id: scope.agency_id,
            user_id: scope.user_id,
            status: response.status().as_u16(),
            outcome,
        }));
        response
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Add-kitten form fields.
#[derive(Debug, Deserialize)]
struct KittenFormInput {
    /// First name.
    #[serde(default)]
    first_name: String,
    /// Last name.
    #[serde(default)]
    last_name: String,
    /// External kitten id.
    #[serde(default)]
    kitten_id: String,
}

/// Handles `GET /cat-manager/{agency_id}/kittens`.
async fn list_kittens(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(raw_agency_id): Path<String>,
) -> Response {
    let mut scope = RequestScope::new(method, KITTENS_ROUTE);
    let result = render_list(&state, &headers, &raw_agency_id, &mut scope).await;
    state.finish(scope, result)
}

/// Builds the kitten list response.
async fn render_list(
    state: &AppState,
    headers: &HeaderMap,
    raw_agency_id: &str,
    scope: &mut RequestScope,
) -> Result<Response, WebError> {
    let access = state.agency_access(headers, raw_agency_id, scope).await?;
    let agency_id = access.agency.id;
    let kittens = run_store(&state.store, move |store| store.kittens_for_agency(agency_id)).await?;
    let view =
        KittenListView::build(&access.agency, kittens, &access.identity, state.features.as_ref());
    if wants_json(headers) {
        return Ok(Json(view).into_response());
    }
    Ok(Html(render_kitten_list(&view)?).into_response())
}

/// Handles `GET /cat-manager/{agency_id}/kitten-form`.
async fn show_kitten_form(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(raw_agency_id): Path<String>,
) -> Response {
    let mut scope = RequestScope::new(method, KITTEN_FORM_ROUTE);
    let result = match state.agency_access(&headers, &raw_agency_id, &mut scope).await {
        Ok(access) => {
            let view = KittenFormView::build(&access.agency);
            render_kitten_form(&view)
                .map(|body| Html(body).into_response())
                .map_err(WebError::from)
        }
        Err(error) => Err(error),
    };
    state.finish(scope, result)
}

/// Handles `POST /cat-manager/{agency_id}/kitten-form`.
async fn create_kitten(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(raw_agency_id): Path<String>,
    form: Result<Form<KittenFormInput>, FormRejection>,
) -> Response {
    let mut scope = RequestScope::new(method, KITTEN_FORM_ROUTE);
    let result = insert_from_form(&state, &headers, &raw_agency_id, form, &mut scope).await;
    state.finish(scope, result)
}

/// Validates the form and inserts the kitten.
async fn insert_from_form(
    state: &AppState,
    headers: &HeaderMap,
    raw_agency_id: &str,
    form: Result<Form<KittenFormInput>, FormRejection>,
    scope: &mut RequestScope,
) -> Result<Response, WebError> {
    let access = state.agency_access(headers, raw_agency_id, scope).await?;
    let Form(input) = form.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            WebError::PayloadTooLarge
        } else {
            WebError::BadRequest(rejection.body_text())
        }
    })?;
    let agency_id = access.agency.id;
    let kitten = NewKitten::new(agency_id, input.first_name, input.last_name, input.kitten_id);
    run_store(&state.store, move |store| store.insert_kitten(kitten)).await?;
    Ok(Redirect::to(&format!("/cat-manager/{agency_id}/kittens")).into_response())
}

/// Handles `GET /healthz`.
async fn health() -> &'static str {
    "ok"
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs a store operation on the blocking pool.
async fn run_store<T, F>(store: &SharedKittenStore, operation: F) -> Result<T, WebError>
where
    T: Send + 'static,
    F: FnOnce(&SharedKittenStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || operation(&store))
        .await
        .map_err(|err| WebError::Internal(format!("store task failed: {err}")))?
        .map_err(WebError::from)
}

/// Returns true when the client asked for JSON.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("application/json"))
}

/// Returns the current unix time in seconds.
fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
