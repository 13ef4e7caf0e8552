// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only shift catalog and per-holder preferences.

use crate::error::{ApiError, CatalogError, translate_domain_error};
use serde::Deserialize;
use shift_hold_domain::{
    HolderId, Preference, Shift, ShiftId, validate_holder, validate_preference, validate_shift,
};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

/// Source of bookable shifts and the preferences used to rank them.
pub trait ShiftCatalog {
    /// Returns every bookable shift.
    fn shifts(&self) -> &[Shift];

    /// Returns the preferences recorded for `holder`.
    fn preferences_for(&self, holder: &HolderId) -> Vec<Preference>;

    /// Looks up one shift.
    fn shift(&self, shift_id: &ShiftId) -> Option<&Shift> {
        self.shifts().iter().find(|s| s.shift_id == *shift_id)
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogSeed {
    #[serde(default)]
    shifts: Vec<Shift>,
    #[serde(default)]
    preferences: BTreeMap<String, Vec<Preference>>,
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShiftCatalog {
    shifts: Vec<Shift>,
    preferences: BTreeMap<HolderId, Vec<Preference>>,
}

impl InMemoryShiftCatalog {
    /// Builds a catalog from a list of shifts.
    ///
    /// # Errors
    ///
    /// Returns an error if any shift is malformed or two shifts share an id.
    pub fn new(shifts: Vec<Shift>) -> Result<Self, ApiError> {
        let mut seen: HashSet<&ShiftId> = HashSet::new();
        for shift in &shifts {
            validate_shift(shift).map_err(translate_domain_error)?;
            if !seen.insert(&shift.shift_id) {
                return Err(ApiError::InvalidInput {
                    field: String::from("shift_id"),
                    message: format!("Duplicate shift '{}'", shift.shift_id),
                });
            }
        }
        Ok(Self {
            shifts,
            preferences: BTreeMap::new(),
        })
    }

    /// Parses a JSON seed of the form `{"shifts": [...], "preferences": {"holder": [...]}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any entry is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let seed: CatalogSeed = serde_json::from_str(json)?;
        let mut catalog: Self = Self::new(seed.shifts).map_err(CatalogError::Invalid)?;
        for (holder, preferences) in seed.preferences {
            let holder: HolderId = HolderId::new(&holder);
            for preference in preferences {
                catalog
                    .add_preference(&holder, preference)
                    .map_err(CatalogError::Invalid)?;
            }
        }
        Ok(catalog)
    }

    /// Loads a JSON seed from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json: String = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog: Self = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            shifts = catalog.shifts.len(),
            holders = catalog.preferences.len(),
            "Loaded shift catalog"
        );
        Ok(catalog)
    }

    /// Records a preference for `holder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the holder is invalid or the preference is empty.
    pub fn add_preference(
        &mut self,
        holder: &HolderId,
        preference: Preference,
    ) -> Result<(), ApiError> {
        validate_holder(holder).map_err(translate_domain_error)?;
        validate_preference(&preference).map_err(translate_domain_error)?;
        self.preferences
            .entry(holder.clone())
            .or_default()
            .push(preference);
        Ok(())
    }
}

impl ShiftCatalog for InMemoryShiftCatalog {
    fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    fn preferences_for(&self, holder: &HolderId) -> Vec<Preference> {
        self.preferences.get(holder).cloned().unwrap_or_default()
    }
}
