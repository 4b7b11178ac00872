// cat-manager-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cat Manager Interfaces
// Description: Backend-agnostic persistence interface.
// Purpose: Let the web layer and fixtures share one store contract.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! [`KittenStore`] is the only persistence seam. Stores promise no ordering
//! for returned rows; presentation order is decided by the view layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Agency;
use crate::core::AgencyId;
use crate::core::Kitten;
use crate::core::NewAgency;
use crate::core::NewKitten;

// ============================================================================
// SECTION: Kitten Store
// ============================================================================

/// Kitten store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("kitten store io error: {0}")]
    Io(String),
    /// Store data is corrupted.
    #[error("kitten store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("kitten store version mismatch: {0}")]
    VersionMismatch(String),
    /// Input or stored data is invalid.
    #[error("kitten store invalid data: {0}")]
    Invalid(String),
    /// Unique key already taken.
    #[error("kitten store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("kitten store error: {0}")]
    Store(String),
}

/// Persistence for agencies and kittens.
pub trait KittenStore {
    /// Inserts an agency.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the agency id already exists.
    fn insert_agency(&self, agency: NewAgency) -> Result<Agency, StoreError>;

    /// Loads an agency by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn agency(&self, agency_id: AgencyId) -> Result<Option<Agency>, StoreError>;

    /// Deletes every agency and returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when deletion fails.
    fn remove_agencies(&self) -> Result<usize, StoreError>;

    /// Inserts a kitten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for missing fields and
    /// [`StoreError::Conflict`] when the kitten id already exists.
    fn insert_kitten(&self, kitten: NewKitten) -> Result<Kitten, StoreError>;

    /// Returns the kittens of one agency, unordered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn kittens_for_agency(&self, agency_id: AgencyId) -> Result<Vec<Kitten>, StoreError>;

    /// Returns every kitten, unordered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn kittens(&self) -> Result<Vec<Kitten>, StoreError>;

    /// Deletes every kitten and returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when deletion fails.
    fn remove_kittens(&self) -> Result<usize, StoreError>;
}
