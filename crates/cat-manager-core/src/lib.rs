// cat-manager-core/src/lib.rs
// ============================================================================
// Module: Cat Manager Core Library
// Description: Public API surface for the Cat Manager core.
// Purpose: Expose domain types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Cat Manager core holds the backend-agnostic pieces of the kitten manager:
//! agency and kitten records, the [`KittenStore`] persistence interface,
//! per-request feature evaluation, static access grants, and the kitten list
//! view-model that both the HTML and JSON renderings are built from.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::KittenStore;
pub use interfaces::StoreError;
pub use runtime::InMemoryKittenStore;
pub use runtime::SharedKittenStore;
