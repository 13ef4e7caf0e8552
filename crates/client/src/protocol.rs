// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Messages exchanged between the coordinator and whatever executes its
//! requests against the lease backend.

use shift_hold_api::{ErrorKind, ErrorResponse};
use shift_hold_domain::{HolderId, LeaseId, ShiftId};
use time::OffsetDateTime;

/// Identifies one request so its reply can be matched to it.
///
/// Tickets increase monotonically per coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Wraps a raw ticket number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ticket number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The backend call a request stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseOperation {
    /// Claim a shift with a new lease.
    Create {
        /// The shift to claim.
        shift_id: ShiftId,
    },
    /// Move the held lease to another shift.
    Retarget {
        /// The held lease.
        lease_id: LeaseId,
        /// The new target.
        shift_id: ShiftId,
    },
    /// Confirm the held lease.
    Confirm {
        /// The held lease.
        lease_id: LeaseId,
    },
}

impl LeaseOperation {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Retarget { .. } => "retarget",
            Self::Confirm { .. } => "confirm",
        }
    }
}

/// A request issued by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseRequest {
    /// Ticket to hand back with the reply.
    pub ticket: Ticket,
    /// The session's holder.
    pub holder: HolderId,
    /// What to ask the backend for.
    pub operation: LeaseOperation,
}

/// Why the backend refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseRejection {
    /// The shift is held by someone else.
    Conflict,
    /// The hold window elapsed.
    Expired,
    /// The backend has no such lease.
    NotFound,
    /// The requested shift is not in the catalog.
    UnknownShift,
    /// The lease is no longer pending.
    InvalidState,
    /// The lease belongs to another holder.
    NotHolder,
    /// The request itself was malformed.
    InvalidInput,
}

impl LeaseRejection {
    /// Whether the backend refused the request before looking at the lease.
    ///
    /// Such a refusal says nothing about the held lease, which stays
    /// pending on the backend.
    #[must_use]
    pub const fn leaves_lease_untouched(self) -> bool {
        matches!(self, Self::UnknownShift | Self::InvalidInput)
    }
}

/// The outcome of executing a [`LeaseRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseReply {
    /// A create or retarget succeeded.
    Granted {
        /// The lease now held.
        lease_id: LeaseId,
        /// The shift it targets.
        shift_id: ShiftId,
        /// When the hold window closes.
        expires_at: OffsetDateTime,
    },
    /// A confirm succeeded.
    Confirmed {
        /// The reserved lease.
        lease_id: LeaseId,
        /// When the backend recorded the confirmation.
        confirmed_at: OffsetDateTime,
    },
    /// The backend refused the request.
    Rejected(LeaseRejection),
    /// No verdict could be obtained. Safe to retry.
    Transient(String),
}

impl From<&ErrorResponse> for LeaseReply {
    fn from(error: &ErrorResponse) -> Self {
        let rejection: LeaseRejection = match error.kind {
            ErrorKind::Conflict => LeaseRejection::Conflict,
            ErrorKind::Expired => LeaseRejection::Expired,
            ErrorKind::NotFound => LeaseRejection::NotFound,
            ErrorKind::UnknownShift => LeaseRejection::UnknownShift,
            ErrorKind::InvalidState => LeaseRejection::InvalidState,
            ErrorKind::NotHolder => LeaseRejection::NotHolder,
            ErrorKind::InvalidInput => LeaseRejection::InvalidInput,
            ErrorKind::Internal => return Self::Transient(error.message.clone()),
        };
        Self::Rejected(rejection)
    }
}
