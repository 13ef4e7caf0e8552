// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Saved charging preferences and shift matching.
//!
//! A preference is a partial description of a shift the holder would like.
//! Unset fields act as wildcards.

use crate::shift::Shift;
use serde::{Deserialize, Serialize};

/// A holder's saved charging preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    /// Preferred station.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    /// Preferred connector type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<String>,
    /// Minimum acceptable power rating in kilowatts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_power_kw: Option<u32>,
    /// Preferred location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Preference {
    /// Returns true if no field is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        field_unset(self.station_id.as_deref())
            && field_unset(self.connector_type.as_deref())
            && self.min_power_kw.is_none()
            && field_unset(self.location.as_deref())
    }

    /// Returns true if every constrained field agrees with the shift.
    ///
    /// String fields compare case-insensitively. Power matches when the
    /// shift delivers at least the requested rating.
    #[must_use]
    pub fn matches(&self, shift: &Shift) -> bool {
        text_matches(self.station_id.as_deref(), shift.station_id.value())
            && text_matches(self.connector_type.as_deref(), &shift.connector_type)
            && self.min_power_kw.is_none_or(|min| shift.power_kw >= min)
            && text_matches(self.location.as_deref(), &shift.location)
    }
}

/// Counts how many of `preferences` the shift satisfies.
#[must_use]
pub fn count_matching_preferences(shift: &Shift, preferences: &[Preference]) -> u32 {
    let count = preferences.iter().filter(|p| p.matches(shift)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn field_unset(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn text_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(w) => w.eq_ignore_ascii_case(actual.trim()),
    }
}
