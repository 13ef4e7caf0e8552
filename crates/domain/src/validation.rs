// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::preference::Preference;
use crate::shift::Shift;
use crate::types::HolderId;

/// Validates a holder identity.
///
/// # Errors
///
/// Returns an error if the holder is empty or contains whitespace.
pub fn validate_holder(holder: &HolderId) -> Result<(), DomainError> {
    if holder.value().is_empty() {
        return Err(DomainError::InvalidHolder(String::from(
            "Holder cannot be empty",
        )));
    }

    if holder.value().chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidHolder(format!(
            "Holder '{}' must not contain whitespace",
            holder.value()
        )));
    }

    Ok(())
}

/// Validates that a shift's fields are internally consistent.
///
/// # Errors
///
/// Returns an error if:
/// - Any identifier is empty
/// - The shift ends at or before its start
/// - The power rating is zero
pub fn validate_shift(shift: &Shift) -> Result<(), DomainError> {
    if shift.shift_id.value().is_empty() {
        return Err(DomainError::InvalidShiftId(String::from(
            "Shift id cannot be empty",
        )));
    }

    if shift.station_id.value().is_empty() {
        return Err(DomainError::InvalidStationId(format!(
            "Station id cannot be empty (shift '{}')",
            shift.shift_id
        )));
    }

    if shift.charging_point_id.value().is_empty() {
        return Err(DomainError::InvalidChargePointId(format!(
            "Charging point id cannot be empty (shift '{}')",
            shift.shift_id
        )));
    }

    if shift.end_time <= shift.start_time {
        return Err(DomainError::InvalidShiftTimes {
            shift_id: shift.shift_id.value().to_string(),
            reason: format!(
                "end {} is not after start {}",
                shift.end_time, shift.start_time
            ),
        });
    }

    if shift.power_kw == 0 {
        return Err(DomainError::InvalidPowerRating {
            shift_id: shift.shift_id.value().to_string(),
        });
    }

    Ok(())
}

/// Validates that a preference constrains at least one field.
///
/// # Errors
///
/// Returns `DomainError::EmptyPreference` if every field is unset or blank.
pub fn validate_preference(preference: &Preference) -> Result<(), DomainError> {
    if preference.is_empty() {
        return Err(DomainError::EmptyPreference);
    }
    Ok(())
}
