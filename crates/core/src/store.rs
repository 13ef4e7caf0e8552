// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::LeaseCommand;
use crate::error::CoreError;
use crate::state::{Transition, TransitionResult, lease_snapshot};
use shift_hold_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use shift_hold_domain::{HolderId, Lease, LeaseId, LeaseStatus, ShiftId, validate_holder};
use std::collections::{BTreeMap, HashMap};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Actor id recorded on audit events produced by expiry.
pub const SWEEPER_ACTOR: &str = "expiry-sweeper";

/// The authoritative record of every lease.
///
/// `claims` maps each claimed shift to the one lease that claims it. Every
/// write to a lease's status or target goes through the same `&mut self`
/// borrow as the matching `claims` update, so a claim check and the write
/// that follows it can never interleave with another operation.
#[derive(Debug, Clone)]
pub struct LeaseStore {
    leases: BTreeMap<LeaseId, Lease>,
    claims: HashMap<ShiftId, LeaseId>,
    next_lease_id: i64,
    next_event_id: i64,
    timeline: Vec<AuditEvent>,
}

impl Default for LeaseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            leases: BTreeMap::new(),
            claims: HashMap::new(),
            next_lease_id: 1,
            next_event_id: 1,
            timeline: Vec::new(),
        }
    }

    /// Applies a command.
    ///
    /// # Errors
    ///
    /// Returns whatever the dispatched operation returns.
    pub fn apply(
        &mut self,
        command: LeaseCommand,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<TransitionResult, CoreError> {
        match command {
            LeaseCommand::Create { shift_id, holder } => self.create(shift_id, holder, cause, now),
            LeaseCommand::Retarget {
                lease_id,
                holder,
                shift_id,
            } => self.retarget(lease_id, &holder, shift_id, cause, now),
            LeaseCommand::Confirm { lease_id, holder } => {
                self.confirm(lease_id, &holder, cause, now)
            }
            LeaseCommand::Release { lease_id, holder } => {
                self.release(lease_id, &holder, cause, now)
            }
        }
    }

    /// Grants a pending lease on `shift_id` to `holder`.
    ///
    /// A repeated create by the holder of a pending lease on the same shift
    /// returns that lease unchanged.
    ///
    /// # Errors
    ///
    /// - `DomainViolation` if the holder is blank
    /// - `Conflict` if the shift is claimed by any other lease
    pub fn create(
        &mut self,
        shift_id: ShiftId,
        holder: HolderId,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<TransitionResult, CoreError> {
        validate_holder(&holder)?;
        let expired: Vec<Lease> = self.expire_sweep(now);

        if let Some(existing) = self.claim_for(&shift_id, now) {
            if existing.holder == holder && existing.status == LeaseStatus::Pending {
                debug!(
                    lease_id = %existing.lease_id,
                    shift_id = %shift_id,
                    holder = %holder,
                    "Repeated create for an existing pending lease"
                );
                return Ok(TransitionResult {
                    lease: existing.clone(),
                    transition: Transition::Unchanged,
                    audit_event: None,
                    expired,
                });
            }
            warn!(shift_id = %shift_id, holder = %holder, "Create rejected: shift already held");
            return Err(CoreError::Conflict { shift_id });
        }

        let lease_id: LeaseId = LeaseId::new(self.next_lease_id);
        let lease: Lease = Lease::pending(lease_id, shift_id.clone(), holder.clone(), now)?;
        self.next_lease_id += 1;

        self.claims.insert(shift_id.clone(), lease_id);
        self.leases.insert(lease_id, lease.clone());

        info!(
            lease_id = %lease_id,
            shift_id = %shift_id,
            holder = %holder,
            expires_at = %lease.expires_at,
            "Lease created"
        );

        let event: AuditEvent = self.record(AuditEvent::new(
            Actor::holder(&holder),
            cause,
            Action::new(
                String::from("CreateLease"),
                Some(format!("Claimed shift {shift_id}")),
            ),
            StateSnapshot::absent(),
            lease_snapshot(&lease),
            lease_id,
            shift_id,
            now,
        ));

        Ok(TransitionResult {
            lease,
            transition: Transition::Created,
            audit_event: Some(event),
            expired,
        })
    }

    /// Moves a pending lease to `shift_id` and restarts its window.
    ///
    /// The previous shift is free once this returns. Retargeting onto the
    /// shift already held is a no-op and does not extend the window.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown lease
    /// - `NotHolder` if `holder` does not hold it
    /// - `Expired` if its window has elapsed
    /// - `InvalidState` if it is confirmed or released
    /// - `Conflict` if the new shift is claimed
    pub fn retarget(
        &mut self,
        lease_id: LeaseId,
        holder: &HolderId,
        shift_id: ShiftId,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<TransitionResult, CoreError> {
        let expired: Vec<Lease> = self.expire_sweep(now);
        let current: Lease = self.pending_lease(lease_id, holder, "retarget")?.clone();

        if current.shift_id == shift_id {
            debug!(lease_id = %lease_id, shift_id = %shift_id, "Retarget onto the held shift");
            return Ok(TransitionResult {
                lease: current,
                transition: Transition::Unchanged,
                audit_event: None,
                expired,
            });
        }

        if self.claim_for(&shift_id, now).is_some() {
            warn!(
                lease_id = %lease_id,
                shift_id = %shift_id,
                "Retarget rejected: shift already held"
            );
            return Err(CoreError::Conflict { shift_id });
        }

        let mut moved: Lease = current.clone();
        moved.retarget(shift_id.clone(), now)?;

        self.claims.remove(&current.shift_id);
        self.claims.insert(shift_id.clone(), lease_id);
        self.leases.insert(lease_id, moved.clone());

        info!(
            lease_id = %lease_id,
            from = %current.shift_id,
            to = %shift_id,
            expires_at = %moved.expires_at,
            "Lease retargeted"
        );

        let event: AuditEvent = self.record(AuditEvent::new(
            Actor::holder(holder),
            cause,
            Action::new(
                String::from("RetargetLease"),
                Some(format!("Moved from shift {} to {shift_id}", current.shift_id)),
            ),
            lease_snapshot(&current),
            lease_snapshot(&moved),
            lease_id,
            shift_id,
            now,
        ));

        Ok(TransitionResult {
            lease: moved,
            transition: Transition::Retargeted {
                from: current.shift_id,
            },
            audit_event: Some(event),
            expired,
        })
    }

    /// Turns a pending lease into a reservation.
    ///
    /// Confirming an already confirmed lease is a no-op for its holder.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown lease
    /// - `NotHolder` if `holder` does not hold it
    /// - `Expired` if its window has elapsed, even by a millisecond
    /// - `InvalidState` if it was released
    pub fn confirm(
        &mut self,
        lease_id: LeaseId,
        holder: &HolderId,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<TransitionResult, CoreError> {
        let expired: Vec<Lease> = self.expire_sweep(now);
        let current: Lease = self.held_lease(lease_id, holder)?.clone();

        if current.status == LeaseStatus::Confirmed {
            debug!(lease_id = %lease_id, "Repeated confirm");
            return Ok(TransitionResult {
                lease: current,
                transition: Transition::Unchanged,
                audit_event: None,
                expired,
            });
        }
        Self::ensure_pending(&current, "confirm")?;

        let mut confirmed: Lease = current.clone();
        confirmed.status = LeaseStatus::Confirmed;
        confirmed.confirmed_at = Some(now);
        self.leases.insert(lease_id, confirmed.clone());

        info!(
            lease_id = %lease_id,
            shift_id = %confirmed.shift_id,
            holder = %holder,
            "Lease confirmed"
        );

        let event: AuditEvent = self.record(AuditEvent::new(
            Actor::holder(holder),
            cause,
            Action::new(
                String::from("ConfirmLease"),
                Some(format!("Reserved shift {}", confirmed.shift_id)),
            ),
            lease_snapshot(&current),
            lease_snapshot(&confirmed),
            lease_id,
            confirmed.shift_id.clone(),
            now,
        ));

        Ok(TransitionResult {
            lease: confirmed,
            transition: Transition::Confirmed,
            audit_event: Some(event),
            expired,
        })
    }

    /// Releases a pending lease and frees its shift.
    ///
    /// Not used by the hold coordinator, which lets abandoned leases expire.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown lease
    /// - `NotHolder` if `holder` does not hold it
    /// - `InvalidState` if it is confirmed or expired
    pub fn release(
        &mut self,
        lease_id: LeaseId,
        holder: &HolderId,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<TransitionResult, CoreError> {
        let expired: Vec<Lease> = self.expire_sweep(now);
        let current: Lease = self.held_lease(lease_id, holder)?.clone();

        match current.status {
            LeaseStatus::Released => {
                debug!(lease_id = %lease_id, "Repeated release");
                return Ok(TransitionResult {
                    lease: current,
                    transition: Transition::Unchanged,
                    audit_event: None,
                    expired,
                });
            }
            LeaseStatus::Confirmed | LeaseStatus::Expired => {
                warn!(lease_id = %lease_id, status = %current.status, "Release rejected");
                return Err(CoreError::InvalidState {
                    lease_id,
                    status: current.status,
                    operation: "release",
                });
            }
            LeaseStatus::Pending => {}
        }

        let mut released: Lease = current.clone();
        released.status = LeaseStatus::Released;
        self.claims.remove(&released.shift_id);
        self.leases.insert(lease_id, released.clone());

        info!(lease_id = %lease_id, shift_id = %released.shift_id, "Lease released");

        let event: AuditEvent = self.record(AuditEvent::new(
            Actor::holder(holder),
            cause,
            Action::new(
                String::from("ReleaseLease"),
                Some(format!("Released shift {}", released.shift_id)),
            ),
            lease_snapshot(&current),
            lease_snapshot(&released),
            lease_id,
            released.shift_id.clone(),
            now,
        ));

        Ok(TransitionResult {
            lease: released,
            transition: Transition::Released,
            audit_event: Some(event),
            expired,
        })
    }

    /// Expires every pending lease whose window has elapsed at `now` and
    /// frees its shift.
    ///
    /// Returns the leases that changed, in id order. Runs at the start of
    /// every other operation and on the server's sweep interval.
    ///
    /// Only leases in `claims` are visited; every pending lease has a claim,
    /// so terminal leases never cost anything here.
    pub fn expire_sweep(&mut self, now: OffsetDateTime) -> Vec<Lease> {
        let mut overdue: Vec<LeaseId> = self
            .claims
            .values()
            .filter_map(|lease_id| self.leases.get(lease_id))
            .filter(|lease| lease.is_overdue(now))
            .map(|lease| lease.lease_id)
            .collect();
        overdue.sort_unstable();

        let mut expired: Vec<Lease> = Vec::with_capacity(overdue.len());
        for lease_id in overdue {
            let Some(lease) = self.leases.get_mut(&lease_id) else {
                continue;
            };
            let before: StateSnapshot = lease_snapshot(lease);
            lease.status = LeaseStatus::Expired;
            let after_lease: Lease = lease.clone();

            self.claims.remove(&after_lease.shift_id);

            info!(
                lease_id = %lease_id,
                shift_id = %after_lease.shift_id,
                expired_at = %after_lease.expires_at,
                "Lease expired"
            );

            self.record(AuditEvent::new(
                Actor::system(SWEEPER_ACTOR),
                Cause::new(
                    String::from("hold-window"),
                    String::from("Hold window elapsed"),
                ),
                Action::new(String::from("ExpireLease"), None),
                before,
                lease_snapshot(&after_lease),
                lease_id,
                after_lease.shift_id.clone(),
                now,
            ));
            expired.push(after_lease);
        }
        expired
    }

    /// Returns a lease by id as last written.
    ///
    /// Run [`Self::expire_sweep`] first for a view that reflects `now`.
    #[must_use]
    pub fn get(&self, lease_id: LeaseId) -> Option<&Lease> {
        self.leases.get(&lease_id)
    }

    /// Returns the lease that excludes others from `shift_id` at `now`.
    #[must_use]
    pub fn claim_for(&self, shift_id: &ShiftId, now: OffsetDateTime) -> Option<&Lease> {
        self.claims
            .get(shift_id)
            .and_then(|lease_id| self.leases.get(lease_id))
            .filter(|lease| lease.claims_shift(now))
    }

    /// Returns true if `holder` may claim `shift_id` at `now`.
    ///
    /// A shift the holder already holds pending counts as available to them.
    #[must_use]
    pub fn is_available(&self, shift_id: &ShiftId, holder: &HolderId, now: OffsetDateTime) -> bool {
        self.claim_for(shift_id, now).is_none_or(|lease| {
            lease.holder == *holder && lease.status == LeaseStatus::Pending
        })
    }

    /// Returns every recorded audit event in order.
    #[must_use]
    pub fn audit_timeline(&self) -> &[AuditEvent] {
        &self.timeline
    }

    /// Iterates all leases in id order.
    pub fn leases(&self) -> impl Iterator<Item = &Lease> {
        self.leases.values()
    }

    fn record(&mut self, event: AuditEvent) -> AuditEvent {
        let recorded: AuditEvent = event.with_event_id(self.next_event_id);
        self.next_event_id += 1;
        self.timeline.push(recorded.clone());
        recorded
    }

    fn held_lease(&self, lease_id: LeaseId, holder: &HolderId) -> Result<&Lease, CoreError> {
        let lease: &Lease = self.leases.get(&lease_id).ok_or_else(|| {
            warn!(lease_id = %lease_id, "Unknown lease");
            CoreError::NotFound(lease_id)
        })?;
        if lease.holder != *holder {
            warn!(lease_id = %lease_id, holder = %holder, "Lease held by another holder");
            return Err(CoreError::NotHolder(lease_id));
        }
        Ok(lease)
    }

    fn pending_lease(
        &self,
        lease_id: LeaseId,
        holder: &HolderId,
        operation: &'static str,
    ) -> Result<&Lease, CoreError> {
        let lease: &Lease = self.held_lease(lease_id, holder)?;
        Self::ensure_pending(lease, operation)?;
        Ok(lease)
    }

    fn ensure_pending(lease: &Lease, operation: &'static str) -> Result<(), CoreError> {
        match lease.status {
            LeaseStatus::Pending => Ok(()),
            LeaseStatus::Expired => {
                warn!(lease_id = %lease.lease_id, operation, "Lease already expired");
                Err(CoreError::Expired {
                    lease_id: lease.lease_id,
                    expired_at: lease.expires_at,
                })
            }
            LeaseStatus::Confirmed | LeaseStatus::Released => {
                warn!(
                    lease_id = %lease.lease_id,
                    status = %lease.status,
                    operation,
                    "Lease not pending"
                );
                Err(CoreError::InvalidState {
                    lease_id: lease.lease_id,
                    status: lease.status,
                    operation,
                })
            }
        }
    }
}
