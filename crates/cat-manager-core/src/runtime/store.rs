// cat-manager-core/src/runtime/store.rs
// ============================================================================
// Module: Cat Manager In-Memory Store
// Description: Simple in-memory kitten store for tests and local runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`KittenStore`] for
//! tests and local demos, plus [`SharedKittenStore`], the clonable trait
//! object wrapper the server and fixtures hold.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::Agency;
use crate::core::AgencyId;
use crate::core::Kitten;
use crate::core::KittenId;
use crate::core::NewAgency;
use crate::core::NewKitten;
use crate::interfaces::KittenStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Tables held by the in-memory store.
#[derive(Debug, Default)]
struct Tables {
    /// Agencies keyed by id.
    agencies: BTreeMap<AgencyId, Agency>,
    /// Kittens keyed by external id.
    kittens: BTreeMap<KittenId, Kitten>,
}

/// In-memory kitten store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKittenStore {
    /// Tables protected by a mutex.
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryKittenStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the tables.
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Store("kitten store mutex poisoned".to_string()))
    }
}

impl KittenStore for InMemoryKittenStore {
    fn insert_agency(&self, agency: NewAgency) -> Result<Agency, StoreError> {
        let agency = agency.into_agency();
        let mut tables = self.lock()?;
        if tables.agencies.contains_key(&agency.id) {
            return Err(StoreError::Conflict(format!("agency {} already exists", agency.id)));
        }
        tables.agencies.insert(agency.id, agency.clone());
        drop(tables);
        Ok(agency)
    }

    fn agency(&self, agency_id: AgencyId) -> Result<Option<Agency>, StoreError> {
        Ok(self.lock()?.agencies.get(&agency_id).cloned())
    }

    fn remove_agencies(&self) -> Result<usize, StoreError> {
        let mut tables = self.lock()?;
        let removed = tables.agencies.len();
        tables.agencies.clear();
        drop(tables);
        Ok(removed)
    }

    fn insert_kitten(&self, kitten: NewKitten) -> Result<Kitten, StoreError> {
        let kitten = kitten.validate()?;
        let mut tables = self.lock()?;
        if tables.kittens.contains_key(&kitten.kitten_id) {
            return Err(StoreError::Conflict(format!(
                "kitten {} already exists",
                kitten.kitten_id
            )));
        }
        tables.kittens.insert(kitten.kitten_id.clone(), kitten.clone());
        drop(tables);
        Ok(kitten)
    }

    fn kittens_for_agency(&self, agency_id: AgencyId) -> Result<Vec<Kitten>, StoreError> {
        Ok(self
            .lock()?
            .kittens
            .values()
            .filter(|kitten| kitten.agency_id == agency_id)
            .cloned()
            .collect())
    }

    fn kittens(&self) -> Result<Vec<Kitten>, StoreError> {
        Ok(self.lock()?.kittens.values().cloned().collect())
    }

    fn remove_kittens(&self) -> Result<usize, StoreError> {
        let mut tables = self.lock()?;
        let removed = tables.kittens.len();
        tables.kittens.clear();
        drop(tables);
        Ok(removed)
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared kitten store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedKittenStore {
    /// Inner store implementation.
    inner: Arc<dyn KittenStore + Send + Sync>,
}

impl SharedKittenStore {
    /// Wraps a kitten store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl KittenStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl KittenStore for SharedKittenStore {
    fn insert_agency(&self, agency: NewAgency) -> Result<Agency, StoreError> {
        self.inner.insert_agency(agency)
    }

    fn agency(&self, agency_id: AgencyId) -> Result<Option<Agency>, StoreError> {
        self.inner.agency(agency_id)
    }

    fn remove_agencies(&self) -> Result<usize, StoreError> {
        self.inner.remove_agencies()
    }

    fn insert_kitten(&self, kitten: NewKitten) -> Result<Kitten, StoreError> {
        self.inner.insert_kitten(kitten)
    }

    fn kittens_for_agency(&self, agency_id: AgencyId) -> Result<Vec<Kitten>, StoreError> {
        self.inner.kittens_for_agency(agency_id)
    }

    fn kittens(&self) -> Result<Vec<Kitten>, StoreError> {
        self.inner.kittens()
    }

    fn remove_kittens(&self) -> Result<usize, StoreError> {
        self.inner.remove_kittens()
    }
}
