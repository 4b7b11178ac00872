// cat-manager-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Kitten Store
// Description: Durable KittenStore backend using SQLite.
// Purpose: Persist agencies and kittens across server restarts.
// Dependencies: cat-manager-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`KittenStore`] implementation with a
//! versioned schema, WAL journaling by default, and unique keys on agency and
//! kitten external ids.
//!
//! [`KittenStore`]: cat_manager_core::KittenStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteKittenStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
