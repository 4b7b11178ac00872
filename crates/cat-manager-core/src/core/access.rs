// cat-manager-core/src/core/access.rs
// ============================================================================
// Module: Access Policy
// Description: Static user-to-agency grants.
// Purpose: Decide whether an authenticated user may act on an agency.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Access is fail-closed: a user may view or edit an agency only when a
//! grant names that agency. Authentication is the caller's concern; this
//! module only sees an already verified [`UserId`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::identifiers::AgencyId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Grant listing the agencies one user may manage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// Granted user.
    pub user_id: UserId,
    /// Agencies the user may manage.
    pub agencies: BTreeSet<AgencyId>,
}

impl AccessGrant {
    /// Creates a grant for the listed agencies.
    #[must_use]
    pub fn new(user_id: UserId, agencies: impl IntoIterator<Item = AgencyId>) -> Self {
        Self {
            user_id,
            agencies: agencies.into_iter().collect(),
        }
    }
}

/// Access denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// User holds no grant for the agency.
    #[error("user {user_id} may not manage agency {agency_id}")]
    Forbidden {
        /// Requesting user.
        user_id: UserId,
        /// Target agency.
        agency_id: AgencyId,
    },
}

/// Static access policy built from grants.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    /// Agencies keyed by user.
    grants: BTreeMap<UserId, BTreeSet<AgencyId>>,
}

impl AccessPolicy {
    /// Builds a policy from grants; repeated users accumulate agencies.
    #[must_use]
    pub fn from_grants(grants: impl IntoIterator<Item = AccessGrant>) -> Self {
        let mut policy = Self::default();
        for grant in grants {
            policy.grants.entry(grant.user_id).or_default().extend(grant.agencies);
        }
        policy
    }

    /// Checks whether the user may manage the agency.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Forbidden`] when no grant covers the agency.
    pub fn authorize(&self, user_id: UserId, agency_id: AgencyId) -> Result<(), AccessError> {
        let allowed =
            self.grants.get(&user_id).is_some_and(|agencies| agencies.contains(&agency_id));
        if allowed {
            Ok(())
        } else {
            Err(AccessError::Forbidden {
                user_id,
                agency_id,
            })
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
