// cat-manager-core/src/runtime/mod.rs
// ============================================================================
// Module: Cat Manager Runtime
// Description: Store implementations shipped with the core.
// Purpose: Provide the in-memory store and the shared store wrapper.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime helpers that do not need external storage engines.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::InMemoryKittenStore;
pub use store::SharedKittenStore;
