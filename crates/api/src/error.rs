// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use serde::{Deserialize, Serialize};
use shift_hold::CoreError;
use shift_hold_domain::DomainError;
use thiserror::Error;

/// Machine-readable error category carried in every error body.
///
/// Clients branch on this rather than on status codes or message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or invalid request field.
    InvalidInput,
    /// Unknown lease.
    NotFound,
    /// The requested shift is not in the catalog.
    UnknownShift,
    /// The shift is claimed by someone else.
    Conflict,
    /// The hold window elapsed.
    Expired,
    /// The lease is not in a status that permits the operation.
    InvalidState,
    /// The caller does not hold the lease.
    NotHolder,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::UnknownShift => "unknown_shift",
            Self::Conflict => "conflict",
            Self::Expired => "expired",
            Self::InvalidState => "invalid_state",
            Self::NotHolder => "not_holder",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The requested shift is not in the catalog.
    UnknownShift {
        /// The requested shift id.
        shift_id: String,
    },
    /// The shift is unavailable.
    Conflict {
        /// The contested shift.
        shift_id: String,
    },
    /// The hold window elapsed before the request.
    Expired {
        /// The lease concerned.
        lease_id: i64,
        /// A human-readable description.
        message: String,
    },
    /// The lease cannot undergo the requested operation.
    InvalidState {
        /// The lease concerned.
        lease_id: i64,
        /// A human-readable description.
        message: String,
    },
    /// The lease belongs to another holder.
    NotHolder {
        /// The lease concerned.
        lease_id: i64,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the machine-readable category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::UnknownShift { .. } => ErrorKind::UnknownShift,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::NotHolder { .. } => ErrorKind::NotHolder,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::UnknownShift { shift_id } => {
                write!(f, "Shift '{shift_id}' does not exist")
            }
            Self::Conflict { shift_id } => {
                write!(f, "Shift '{shift_id}' is unavailable, pick another")
            }
            Self::Expired { message, .. } | Self::InvalidState { message, .. } => {
                f.write_str(message)
            }
            Self::NotHolder { lease_id } => {
                write!(f, "Lease {lease_id} is held by a different holder")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors raised while loading a shift catalog seed.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The seed file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The seed is not valid JSON of the expected shape.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A seeded record failed validation.
    #[error("Invalid catalog entry: {0}")]
    Invalid(ApiError),
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidHolder(msg) => ApiError::InvalidInput {
            field: String::from("holder"),
            message: msg,
        },
        DomainError::InvalidShiftId(msg) => ApiError::InvalidInput {
            field: String::from("shift_id"),
            message: msg,
        },
        DomainError::InvalidStationId(msg) => ApiError::InvalidInput {
            field: String::from("station_id"),
            message: msg,
        },
        DomainError::InvalidChargePointId(msg) => ApiError::InvalidInput {
            field: String::from("charging_point_id"),
            message: msg,
        },
        DomainError::InvalidShiftTimes { shift_id, reason } => ApiError::InvalidInput {
            field: String::from("end_time"),
            message: format!("Shift '{shift_id}': {reason}"),
        },
        DomainError::InvalidPowerRating { shift_id } => ApiError::InvalidInput {
            field: String::from("power_kw"),
            message: format!("Shift '{shift_id}' must advertise a positive power rating"),
        },
        DomainError::EmptyPreference => ApiError::InvalidInput {
            field: String::from("preference"),
            message: String::from("At least one preference field must be set"),
        },
        DomainError::InvalidLeaseStatus(status) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown lease status '{status}'"),
        },
        DomainError::ShiftNotFound(shift_id) => ApiError::UnknownShift { shift_id },
        DomainError::DateArithmeticOverflow { operation } => ApiError::Internal {
            message: format!("Date arithmetic overflow while {operation}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Conflict { shift_id } => ApiError::Conflict {
            shift_id: shift_id.value().to_string(),
        },
        CoreError::NotFound(lease_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Lease"),
            message: format!("Lease {lease_id} does not exist"),
        },
        CoreError::InvalidState {
            lease_id,
            status,
            operation,
        } => ApiError::InvalidState {
            lease_id: lease_id.value(),
            message: format!("Cannot {operation} lease {lease_id}: lease is {status}"),
        },
        CoreError::Expired {
            lease_id,
            expired_at,
        } => ApiError::Expired {
            lease_id: lease_id.value(),
            message: format!("Hold on lease {lease_id} expired at {expired_at}, please reselect"),
        },
        CoreError::NotHolder(lease_id) => ApiError::NotHolder {
            lease_id: lease_id.value(),
        },
    }
}
