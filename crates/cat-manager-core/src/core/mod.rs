// cat-manager-core/src/core/mod.rs
// ============================================================================
// Module: Cat Manager Core Types
// Description: Domain records, identities, features, access, and views.
// Purpose: Group the serializable building blocks shared by every crate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types are plain data with light invariants. Persistence lives behind
//! [`crate::interfaces::KittenStore`]; HTTP concerns live in the web crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access;
pub mod features;
pub mod identifiers;
pub mod identity;
pub mod records;
pub mod view;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access::AccessError;
pub use access::AccessGrant;
pub use access::AccessPolicy;
pub use features::ADD_KITTEN_FLAG;
pub use features::DisabledFeatures;
pub use features::FeatureEvaluator;
pub use features::FeaturePredicate;
pub use features::FlagDescriptor;
pub use features::FlagRule;
pub use features::StaticFeatureFlags;
pub use identifiers::AgencyId;
pub use identifiers::KittenId;
pub use identifiers::UserId;
pub use identity::UserIdentity;
pub use records::Agency;
pub use records::AgencyKind;
pub use records::Kitten;
pub use records::NewAgency;
pub use records::NewKitten;
pub use view::AgencySummary;
pub use view::KITTEN_FORM_TITLE;
pub use view::KITTEN_LIST_TITLE;
pub use view::KittenFormView;
pub use view::KittenListView;
pub use view::KittenRow;
pub use view::sort_kittens;
