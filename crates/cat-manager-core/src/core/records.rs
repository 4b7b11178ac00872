// cat-manager-core/src/core/records.rs
// ============================================================================
// Module: Cat Manager Records
// Description: Agency and kitten records plus their insert payloads.
// Purpose: Define what the store persists and what callers may supply.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`NewAgency`] and [`NewKitten`] are insert payloads; unspecified agency
//! fields take defaults. A kitten references its agency by [`AgencyId`] only,
//! and the reference is not enforced by stores.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AgencyId;
use crate::core::identifiers::KittenId;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length for kitten names and external ids.
pub const MAX_FIELD_LENGTH: usize = 128;

// ============================================================================
// SECTION: Agency
// ============================================================================

/// Whether an agency is run in-house or by a third party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyKind {
    /// Agency operated in-house.
    InHouse,
    /// Agency operated by a third party.
    #[default]
    ThirdParty,
}

impl AgencyKind {
    /// Returns the stable storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InHouse => "in_house",
            Self::ThirdParty => "third_party",
        }
    }

    /// Parses a storage label.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for unknown labels.
    pub fn parse(label: &str) -> Result<Self, StoreError> {
        match label {
            "in_house" => Ok(Self::InHouse),
            "third_party" => Ok(Self::ThirdParty),
            other => Err(StoreError::Invalid(format!("unknown agency kind: {other}"))),
        }
    }
}

/// Persisted agency record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    /// External online identifier.
    pub id: AgencyId,
    /// Display name.
    pub name: String,
    /// In-house or third-party.
    pub kind: AgencyKind,
}

impl Agency {
    /// Returns true when the agency is operated in-house.
    #[must_use]
    pub fn is_in_house(&self) -> bool {
        self.kind == AgencyKind::InHouse
    }
}

/// Agency insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgency {
    /// External online identifier (required).
    pub id: AgencyId,
    /// Optional display name; defaults to `Agency <id>`.
    #[serde(default)]
    pub name: Option<String>,
    /// Agency kind; defaults to third-party.
    #[serde(default)]
    pub kind: AgencyKind,
}

impl NewAgency {
    /// Creates a payload with default name and kind.
    #[must_use]
    pub const fn new(id: AgencyId) -> Self {
        Self {
            id,
            name: None,
            kind: AgencyKind::ThirdParty,
        }
    }

    /// Marks the agency as in-house.
    #[must_use]
    pub const fn in_house(mut self) -> Self {
        self.kind = AgencyKind::InHouse;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolves defaults into a persisted record.
    #[must_use]
    pub fn into_agency(self) -> Agency {
        let name = self.name.unwrap_or_else(|| format!("Agency {}", self.id));
        Agency {
            id: self.id,
            name,
            kind: self.kind,
        }
    }
}

// ============================================================================
// SECTION: Kitten
// ============================================================================

/// Persisted kitten record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kitten {
    /// External kitten identifier.
    pub kitten_id: KittenId,
    /// Owning agency.
    pub agency_id: AgencyId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl Kitten {
    /// Returns the list label, `"<Last>, <First>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Kitten insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKitten {
    /// Owning agency.
    pub agency_id: AgencyId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// External kitten identifier.
    pub kitten_id: KittenId,
}

impl NewKitten {
    /// Creates a kitten payload.
    #[must_use]
    pub fn new(
        agency_id: AgencyId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        kitten_id: impl Into<KittenId>,
    ) -> Self {
        Self {
            agency_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            kitten_id: kitten_id.into(),
        }
    }

    /// Trims fields and checks required values and lengths.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when a field is empty or too long.
    pub fn validate(self) -> Result<Kitten, StoreError> {
        let first_name = required_field("first_name", &self.first_name)?;
        let last_name = required_field("last_name", &self.last_name)?;
        let kitten_id = required_field("kitten_id", self.kitten_id.as_str())?;
        Ok(Kitten {
            kitten_id: KittenId::new(kitten_id),
            agency_id: self.agency_id,
            first_name,
            last_name,
        })
    }
}

/// Returns the trimmed value or an invalid-field error.
fn required_field(name: &str, value: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Invalid(format!("{name} is required")));
    }
    if trimmed.len() > MAX_FIELD_LENGTH {
        return Err(StoreError::Invalid(format!(
            "{name} exceeds {MAX_FIELD_LENGTH} bytes"
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
