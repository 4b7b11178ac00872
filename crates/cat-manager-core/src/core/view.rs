// cat-manager-core/src/core/view.rs
// ============================================================================
// Module: Page View Models
// Description: Typed view-models for the kitten list and kitten form pages.
// Purpose: Single source for both HTML rendering and the JSON contract.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`KittenListView::build`] applies the page rules: only kittens of the
//! requested agency, sorted by last name ascending (ties by first name, then
//! kitten id), and the add-kitten affordance. Names compare case-insensitively
//! so `de Vries` lands between `Barner` and `Louise`; names equal up to case
//! fall back to byte order. Third-party agencies always get
//! the affordance; in-house agencies get it only when [`ADD_KITTEN_FLAG`] is
//! on for the viewer and agency.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::core::features::ADD_KITTEN_FLAG;
use crate::core::features::FeatureEvaluator;
use crate::core::features::FlagDescriptor;
use crate::core::identifiers::AgencyId;
use crate::core::identifiers::KittenId;
use crate::core::identity::UserIdentity;
use crate::core::records::Agency;
use crate::core::records::AgencyKind;
use crate::core::records::Kitten;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Title of the kitten list page.
pub const KITTEN_LIST_TITLE: &str = "Tes - Kittens";
/// Title of the add-kitten form page.
pub const KITTEN_FORM_TITLE: &str = "Tes - Add kitten";

// ============================================================================
// SECTION: View Types
// ============================================================================

/// Agency header shown on agency pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencySummary {
    /// Agency identifier.
    pub id: AgencyId,
    /// Display name.
    pub name: String,
    /// In-house or third-party.
    pub kind: AgencyKind,
}

impl From<&Agency> for AgencySummary {
    fn from(agency: &Agency) -> Self {
        Self {
            id: agency.id,
            name: agency.name.clone(),
            kind: agency.kind,
        }
    }
}

/// One row of the kitten list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KittenRow {
    /// External kitten identifier.
    pub kitten_id: KittenId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Rendered label, `"<Last>, <First>"`.
    pub label: String,
}

impl From<Kitten> for KittenRow {
    fn from(kitten: Kitten) -> Self {
        let label = kitten.display_name();
        Self {
            kitten_id: kitten.kitten_id,
            first_name: kitten.first_name,
            last_name: kitten.last_name,
            label,
        }
    }
}

/// Kitten list page model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KittenListView {
    /// Page title.
    pub title: String,
    /// Viewer display name.
    pub viewer: String,
    /// Agency header.
    pub agency: AgencySummary,
    /// Whether the add-kitten affordance is shown.
    pub show_add_kitten: bool,
    /// Sorted kitten rows.
    pub kittens: Vec<KittenRow>,
}

impl KittenListView {
    /// Builds the list view for an agency.
    #[must_use]
    pub fn build(
        agency: &Agency,
        kittens: Vec<Kitten>,
        viewer: &UserIdentity,
        features: &dyn FeatureEvaluator,
    ) -> Self {
        let mut kittens: Vec<Kitten> =
            kittens.into_iter().filter(|kitten| kitten.agency_id == agency.id).collect();
        sort_kittens(&mut kittens);
        Self {
            title: KITTEN_LIST_TITLE.to_string(),
            viewer: viewer.display_name(),
            agency: AgencySummary::from(agency),
            show_add_kitten: add_kitten_visible(agency, viewer, features),
            kittens: kittens.into_iter().map(KittenRow::from).collect(),
        }
    }
}

/// Add-kitten form page model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KittenFormView {
    /// Page title.
    pub title: String,
    /// Agency header.
    pub agency: AgencySummary,
}

impl KittenFormView {
    /// Builds the form view for an agency.
    #[must_use]
    pub fn build(agency: &Agency) -> Self {
        Self {
            title: KITTEN_FORM_TITLE.to_string(),
            agency: AgencySummary::from(agency),
        }
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Sorts kittens by last name, then first name, then kitten id.
pub fn sort_kittens(kittens: &mut [Kitten]) {
    kittens.sort_by(|left, right| {
        compare_names(&left.last_name, &right.last_name)
            .then_with(|| compare_names(&left.first_name, &right.first_name))
            .then_with(|| left.kitten_id.cmp(&right.kitten_id))
    });
}

/// Compares names ignoring case, then by bytes.
fn compare_names(left: &str, right: &str) -> Ordering {
    let folded_left = left.chars().flat_map(char::to_lowercase);
    let folded_right = right.chars().flat_map(char::to_lowercase);
    folded_left.cmp(folded_right).then_with(|| left.cmp(right))
}

/// Returns whether the add-kitten affordance is shown.
fn add_kitten_visible(
    agency: &Agency,
    viewer: &UserIdentity,
    features: &dyn FeatureEvaluator,
) -> bool {
    if !agency.is_in_house() {
        return true;
    }
    features.enabled(&FlagDescriptor {
        flag: ADD_KITTEN_FLAG,
        user_id: viewer.user_id,
        agency_id: agency.id,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
