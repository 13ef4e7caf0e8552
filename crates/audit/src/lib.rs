// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Audit trail for lease transitions.
//!
//! Every successful lease transition produces exactly one immutable
//! [`AuditEvent`]. No-op requests (a repeated confirm, a retarget onto the
//! shift already held) produce none.

use serde::{Deserialize, Serialize};
use shift_hold_domain::{HolderId, LeaseId, ShiftId};
use time::OffsetDateTime;

/// Represents the entity performing an action.
///
/// Lease transitions are initiated either by a holder or by the backend
/// itself (the expiry sweeper, an operator release).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "holder", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an actor for a lease holder.
    #[must_use]
    pub fn holder(holder: &HolderId) -> Self {
        Self::new(holder.value().to_string(), String::from("holder"))
    }

    /// Creates an actor for a backend process.
    #[must_use]
    pub fn system(name: &str) -> Self {
        Self::new(name.to_string(), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`CreateLease`", "`ConfirmLease`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact rendering of one lease before or after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the lease state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot used when no lease existed before the transition.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("none"))
    }
}

/// An immutable audit event representing a lease transition.
///
/// Captures who performed the action, why, what it was, the lease state
/// on either side of it, and which lease and shift it concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The position of this event in the timeline.
    /// `None` until the event is recorded by the lease store.
    pub event_id: Option<i64>,
    /// The actor who initiated this transition.
    pub actor: Actor,
    /// The cause or reason for this transition.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The lease state before the transition.
    pub before: StateSnapshot,
    /// The lease state after the transition.
    pub after: StateSnapshot,
    /// The lease concerned.
    pub lease_id: LeaseId,
    /// The shift targeted after the transition.
    pub shift_id: ShiftId,
    /// When the transition took effect.
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new, unrecorded `AuditEvent`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        lease_id: LeaseId,
        shift_id: ShiftId,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            lease_id,
            shift_id,
            occurred_at,
        }
    }

    /// Returns a copy of this event stamped with its timeline position.
    #[must_use]
    pub fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn create_test_event() -> AuditEvent {
        AuditEvent::new(
            Actor::holder(&HolderId::new("Alice")),
            Cause::new(String::from("req-1"), String::from("Select shift")),
            Action::new(String::from("CreateLease"), None),
            StateSnapshot::absent(),
            StateSnapshot::new(String::from("lease=1,shift=X,status=pending")),
            LeaseId::new(1),
            ShiftId::new("X"),
            datetime!(2026-03-02 08:00:00 UTC),
        )
    }

    #[test]
    fn test_holder_actor_uses_normalized_identity() {
        let actor: Actor = Actor::holder(&HolderId::new("Alice"));

        assert_eq!(actor.id, "alice");
        assert_eq!(actor.actor_type, "holder");
    }

    #[test]
    fn test_system_actor() {
        let actor: Actor = Actor::system("expiry-sweeper");

        assert_eq!(actor.id, "expiry-sweeper");
        assert_eq!(actor.actor_type, "system");
    }

    #[test]
    fn test_new_event_is_unrecorded() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.event_id, None);
        assert_eq!(event.before.data, "none");
        assert_eq!(event.lease_id, LeaseId::new(1));
    }

    #[test]
    fn test_with_event_id_only_stamps_position() {
        let event: AuditEvent = create_test_event();
        let recorded: AuditEvent = event.clone().with_event_id(7);

        assert_eq!(recorded.event_id, Some(7));
        assert_eq!(recorded.action, event.action);
        assert_eq!(recorded.after, event.after);
    }

    #[test]
    fn test_audit_event_equality() {
        assert_eq!(create_test_event(), create_test_event());
        assert_ne!(create_test_event(), create_test_event().with_event_id(1));
    }
}
