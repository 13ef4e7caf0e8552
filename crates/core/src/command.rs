// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_hold_domain::{HolderId, LeaseId, ShiftId};

/// A command represents holder or operator intent as data only.
///
/// Commands are the only way to request lease state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseCommand {
    /// Claim a shift with a fresh pending lease.
    Create {
        /// The shift to claim.
        shift_id: ShiftId,
        /// The identity claiming it.
        holder: HolderId,
    },
    /// Move a pending lease to another shift, restarting its window.
    Retarget {
        /// The lease to move.
        lease_id: LeaseId,
        /// The identity that holds the lease.
        holder: HolderId,
        /// The new target shift.
        shift_id: ShiftId,
    },
    /// Turn a pending lease into a reservation.
    Confirm {
        /// The lease to confirm.
        lease_id: LeaseId,
        /// The identity that holds the lease.
        holder: HolderId,
    },
    /// Give a pending lease back before its window elapses.
    ///
    /// Backend operation only; the hold coordinator never issues it.
    Release {
        /// The lease to release.
        lease_id: LeaseId,
        /// The identity that holds the lease.
        holder: HolderId,
    },
}

impl LeaseCommand {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CreateLease",
            Self::Retarget { .. } => "RetargetLease",
            Self::Confirm { .. } => "ConfirmLease",
            Self::Release { .. } => "ReleaseLease",
        }
    }

    /// Returns the holder issuing this command.
    #[must_use]
    pub const fn holder(&self) -> &HolderId {
        match self {
            Self::Create { holder, .. }
            | Self::Retarget { holder, .. }
            | Self::Confirm { holder, .. }
            | Self::Release { holder, .. } => holder,
        }
    }
}
