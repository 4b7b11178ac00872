// cat-manager-web/src/audit.rs
// ============================================================================
// Module: Request Audit Logging
// Description: Structured audit events for handled HTTP requests.
// Purpose: Emit one JSON line per request without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every handled request produces a [`RequestAuditEvent`] named
//! `cat_manager_request`. Sinks decide where it goes: stderr, an append-only
//! file, nowhere, or an in-memory buffer that tests can inspect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cat_manager_core::AgencyId;
use cat_manager_core::UserId;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Route template that handled the request.
    pub route: &'static str,
    /// Agency id when the path carried a valid one.
    pub agency_id: Option<AgencyId>,
    /// Authenticated user when known.
    pub user_id: Option<UserId>,
    /// Response status code.
    pub status: u16,
    /// Normalized outcome label.
    pub outcome: &'static str,
}

/// Inputs for [`RequestAuditEvent::new`].
#[derive(Debug, Clone)]
pub struct RequestAuditParams {
    /// HTTP method.
    pub method: String,
    /// Route template.
    pub route: &'static str,
    /// Agency id when parsed.
    pub agency_id: Option<AgencyId>,
    /// Authenticated user when known.
    pub user_id: Option<UserId>,
    /// Response status code.
    pub status: u16,
    /// Outcome label.
    pub outcome: &'static str,
}

impl RequestAuditEvent {
    /// Creates a request audit event stamped with the current time.
    #[must_use]
    pub fn new(params: RequestAuditParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "cat_manager_request",
            timestamp_ms,
            method: params.method,
            route: params.route,
            agency_id: params.agency_id,
            user_id: params.user_id,
            status: params.status,
            outcome: params.outcome,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for request events.
pub trait RequestAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RequestAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl RequestAuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RequestAuditSink for FileAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl RequestAuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<RequestAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RequestAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl RequestAuditSink for MemoryAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
