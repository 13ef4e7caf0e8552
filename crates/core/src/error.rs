// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_hold_domain::{DomainError, LeaseId, LeaseStatus, ShiftId};
use time::OffsetDateTime;

/// Errors that can occur during lease transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The shift is already claimed by another lease.
    Conflict {
        /// The contested shift.
        shift_id: ShiftId,
    },
    /// The lease is unknown to the store.
    NotFound(LeaseId),
    /// The lease is not in a status that permits the operation.
    InvalidState {
        /// The lease concerned.
        lease_id: LeaseId,
        /// Its current status.
        status: LeaseStatus,
        /// The operation that was refused.
        operation: &'static str,
    },
    /// The hold window elapsed before the operation.
    Expired {
        /// The lease concerned.
        lease_id: LeaseId,
        /// When its window closed.
        expired_at: OffsetDateTime,
    },
    /// The lease is held by someone else.
    NotHolder(LeaseId),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Conflict { shift_id } => {
                write!(f, "Shift '{shift_id}' is already held")
            }
            Self::NotFound(lease_id) => write!(f, "Lease {lease_id} not found"),
            Self::InvalidState {
                lease_id,
                status,
                operation,
            } => {
                write!(f, "Cannot {operation} lease {lease_id}: lease is {status}")
            }
            Self::Expired {
                lease_id,
                expired_at,
            } => {
                write!(f, "Lease {lease_id} expired at {expired_at}")
            }
            Self::NotHolder(lease_id) => {
                write!(f, "Lease {lease_id} is held by a different holder")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
