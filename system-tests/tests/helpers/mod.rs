// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Cat Manager system-tests.
// Purpose: Provide server harnesses, fixtures, and HTML inspection.
// Dependencies: system-tests, cat-manager-core, cat-manager-web
// ============================================================================

//! ## Overview
//! Shared helpers for Cat Manager system-tests.
//! Invariants:
//! - Every environment owns its server, store, and feature evaluator.
//! - Requests travel over real loopback HTTP.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod inspector;
pub mod readiness;
pub mod timeouts;
