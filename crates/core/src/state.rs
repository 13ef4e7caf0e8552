// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_hold_audit::{AuditEvent, StateSnapshot};
use shift_hold_domain::{Lease, ShiftId};

/// What a store operation did to the lease it addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new pending lease was granted.
    Created,
    /// The lease moved to a new shift; `from` is free again.
    Retargeted {
        /// The shift the lease held before.
        from: ShiftId,
    },
    /// The lease became a reservation.
    Confirmed,
    /// The lease was released before its window elapsed.
    Released,
    /// The request was valid but changed nothing.
    Unchanged,
}

impl Transition {
    /// Returns true if the operation mutated the lease.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The result of a successful store operation.
///
/// Operations are atomic: they either succeed completely or fail without
/// side effects beyond the expiry pass that precedes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The addressed lease after the operation.
    pub lease: Lease,
    /// What happened to it.
    pub transition: Transition,
    /// The recorded audit event, absent for no-ops.
    pub audit_event: Option<AuditEvent>,
    /// Leases the expiry pass moved to `expired` before the operation ran.
    pub expired: Vec<Lease>,
}

/// Renders a lease for the audit trail.
pub(crate) fn lease_snapshot(lease: &Lease) -> StateSnapshot {
    StateSnapshot::new(format!(
        "lease={},shift={},holder={},status={},expires_at={}",
        lease.lease_id, lease.shift_id, lease.holder, lease.status, lease.expires_at
    ))
}
