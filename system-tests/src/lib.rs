// system-tests/src/lib.rs
// ============================================================================
// Module: Cat Manager System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for Cat Manager system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the Cat Manager
//! system-tests binaries in `system-tests/tests`. The binaries themselves
//! start real servers on loopback ports and drive them over HTTP.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
