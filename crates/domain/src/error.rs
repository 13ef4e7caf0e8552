// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Holder identity is empty or invalid.
    InvalidHolder(String),
    /// Shift identifier is empty or invalid.
    InvalidShiftId(String),
    /// Station identifier is empty or invalid.
    InvalidStationId(String),
    /// Charging point identifier is empty or invalid.
    InvalidChargePointId(String),
    /// A shift's time range is empty or inverted.
    InvalidShiftTimes {
        /// The shift whose times are invalid.
        shift_id: String,
        /// Description of the problem.
        reason: String,
    },
    /// A shift advertises zero power.
    InvalidPowerRating {
        /// The shift with the invalid rating.
        shift_id: String,
    },
    /// A preference constrains nothing.
    EmptyPreference,
    /// A lease status string could not be parsed.
    InvalidLeaseStatus(String),
    /// Shift does not exist in the catalog.
    ShiftNotFound(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHolder(msg) => write!(f, "Invalid holder: {msg}"),
            Self::InvalidShiftId(msg) => write!(f, "Invalid shift id: {msg}"),
            Self::InvalidStationId(msg) => write!(f, "Invalid station id: {msg}"),
            Self::InvalidChargePointId(msg) => write!(f, "Invalid charging point id: {msg}"),
            Self::InvalidShiftTimes { shift_id, reason } => {
                write!(f, "Invalid times for shift '{shift_id}': {reason}")
            }
            Self::InvalidPowerRating { shift_id } => {
                write!(
                    f,
                    "Invalid power rating for shift '{shift_id}': must be greater than 0 kW"
                )
            }
            Self::EmptyPreference => {
                write!(f, "Preference must constrain at least one field")
            }
            Self::InvalidLeaseStatus(status) => write!(f, "Invalid lease status: {status}"),
            Self::ShiftNotFound(shift_id) => write!(f, "Shift '{shift_id}' not found"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
