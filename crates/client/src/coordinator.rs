// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::HoldError;
use crate::protocol::{LeaseOperation, LeaseRejection, LeaseReply, LeaseRequest, Ticket};
use shift_hold::Clock;
use shift_hold_domain::{HolderId, LeaseId, ShiftId};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

/// What the session believes it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldState {
    /// No lease.
    Idle,
    /// A pending lease with a running countdown.
    Holding {
        /// The held lease.
        lease_id: LeaseId,
        /// The shift it targets.
        shift_id: ShiftId,
        /// Deadline handed out by the backend.
        deadline: OffsetDateTime,
    },
}

/// Why a hold attempt or an existing hold failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldFailure {
    /// The shift is held or reserved by someone else.
    Unavailable,
    /// The backend refused the request itself, e.g. an unknown shift.
    Invalid(LeaseRejection),
    /// The backend reported the hold window elapsed.
    Expired,
    /// The countdown reached zero with no request outstanding.
    ExpiredLocally,
    /// Local and backend state disagree about the lease.
    Diverged(LeaseRejection),
    /// The backend could not be reached or gave no verdict.
    Transient(String),
}

impl HoldFailure {
    /// The single message shown to the user for this failure.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Unavailable => "That shift is unavailable, please pick another.",
            Self::Invalid(_) => "That shift cannot be selected, please pick another.",
            Self::Expired | Self::ExpiredLocally => "Your hold expired, please reselect a shift.",
            Self::Diverged(_) => "Your hold is no longer valid, please reselect a shift.",
            Self::Transient(_) => "Could not reach the reservation service, please try again.",
        }
    }

    const fn from_rejection(rejection: LeaseRejection) -> Self {
        match rejection {
            LeaseRejection::Conflict => Self::Unavailable,
            LeaseRejection::Expired => Self::Expired,
            other if other.leaves_lease_untouched() => Self::Invalid(other),
            other => Self::Diverged(other),
        }
    }
}

impl std::fmt::Display for HoldFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "shift unavailable"),
            Self::Invalid(rejection) => write!(f, "request refused: {rejection:?}"),
            Self::Expired => write!(f, "hold expired on the backend"),
            Self::ExpiredLocally => write!(f, "hold countdown reached zero"),
            Self::Diverged(rejection) => write!(f, "lease diverged: {rejection:?}"),
            Self::Transient(message) => write!(f, "transient failure: {message}"),
        }
    }
}

/// The observable result of one coordinator step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldOutcome {
    /// A lease is held, freshly created or retargeted.
    Holding {
        /// The held lease.
        lease_id: LeaseId,
        /// The shift it targets.
        shift_id: ShiftId,
        /// Whole seconds left in the hold window.
        remaining_secs: i64,
    },
    /// The countdown moved.
    Countdown {
        /// Whole seconds left in the hold window.
        remaining_secs: i64,
    },
    /// The held shift was reserved. The coordinator is Idle again.
    Reserved {
        /// The confirmed lease.
        lease_id: LeaseId,
        /// The reserved shift.
        shift_id: ShiftId,
    },
    /// The held lease is gone. The coordinator is Idle again.
    Lost {
        /// The lease that was held.
        lease_id: LeaseId,
        /// Why it was lost.
        failure: HoldFailure,
    },
    /// A request failed without changing what is held.
    Failed(HoldFailure),
    /// Nothing happened.
    Unchanged,
    /// A reply arrived for a request that is no longer outstanding.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    ticket: Ticket,
    operation: LeaseOperation,
}

/// Owns the single active lease of one client session.
///
/// All transitions are synchronous. Methods that need the backend return a
/// [`LeaseRequest`]; its reply is fed back through [`Self::apply_reply`].
/// At most one request is outstanding at a time.
pub struct HoldCoordinator {
    holder: HolderId,
    clock: Arc<dyn Clock>,
    state: HoldState,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl HoldCoordinator {
    /// Creates an idle coordinator for `holder`.
    #[must_use]
    pub fn new(holder: HolderId, clock: Arc<dyn Clock>) -> Self {
        Self {
            holder,
            clock,
            state: HoldState::Idle,
            in_flight: None,
            next_ticket: 1,
        }
    }

    /// The session's holder.
    #[must_use]
    pub const fn holder(&self) -> &HolderId {
        &self.holder
    }

    /// The current hold state.
    #[must_use]
    pub const fn state(&self) -> &HoldState {
        &self.state
    }

    /// The ticket of the outstanding request, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.as_ref().map(|f| f.ticket)
    }

    /// Whole seconds left on the held lease, rounded up.
    ///
    /// Reaches zero exactly when the backend would consider the lease
    /// overdue.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<i64> {
        match &self.state {
            HoldState::Idle => None,
            HoldState::Holding { deadline, .. } => Some(whole_seconds_until(
                *deadline,
                self.clock.now(),
            )),
        }
    }

    /// Selects a shift.
    ///
    /// Returns `None` when the shift is already held. Otherwise returns a
    /// create (when Idle) or a retarget of the held lease.
    ///
    /// # Errors
    ///
    /// Returns `RequestInFlight` if a reply is still outstanding.
    pub fn select(&mut self, shift_id: ShiftId) -> Result<Option<LeaseRequest>, HoldError> {
        self.ensure_no_request_in_flight()?;

        let operation: LeaseOperation = match &self.state {
            HoldState::Idle => LeaseOperation::Create { shift_id },
            HoldState::Holding {
                lease_id,
                shift_id: held,
                ..
            } => {
                if *held == shift_id {
                    debug!(%shift_id, lease_id = %lease_id, "Shift already held, nothing to do");
                    return Ok(None);
                }
                LeaseOperation::Retarget {
                    lease_id: *lease_id,
                    shift_id,
                }
            }
        };

        Ok(Some(self.issue(operation)))
    }

    /// Confirms the held lease.
    ///
    /// # Errors
    ///
    /// Returns `NotHolding` when Idle and `RequestInFlight` if a reply is
    /// still outstanding.
    pub fn confirm(&mut self) -> Result<LeaseRequest, HoldError> {
        self.ensure_no_request_in_flight()?;

        match &self.state {
            HoldState::Idle => Err(HoldError::NotHolding),
            HoldState::Holding { lease_id, .. } => {
                let operation = LeaseOperation::Confirm {
                    lease_id: *lease_id,
                };
                Ok(self.issue(operation))
            }
        }
    }

    /// Advances the local countdown.
    ///
    /// At zero the hold is dropped locally, unless a request is still
    /// outstanding; then the lease is kept at zero and the backend reply
    /// decides.
    pub fn tick(&mut self) -> HoldOutcome {
        let Some(remaining_secs) = self.remaining_secs() else {
            return HoldOutcome::Unchanged;
        };

        if remaining_secs > 0 {
            return HoldOutcome::Countdown { remaining_secs };
        }
        if let Some(in_flight) = &self.in_flight {
            debug!(
                ticket = %in_flight.ticket,
                operation = in_flight.operation.name(),
                "Countdown at zero, awaiting backend verdict"
            );
            return HoldOutcome::Countdown { remaining_secs: 0 };
        }
        self.lose(HoldFailure::ExpiredLocally)
    }

    /// Drops the hold locally without telling the backend.
    ///
    /// The backend sweep frees the shift when the window elapses. Any
    /// outstanding reply becomes stale. Returns the forgotten lease.
    pub fn abandon(&mut self) -> Option<LeaseId> {
        self.in_flight = None;
        match std::mem::replace(&mut self.state, HoldState::Idle) {
            HoldState::Idle => None,
            HoldState::Holding {
                lease_id, shift_id, ..
            } => {
                info!(lease_id = %lease_id, %shift_id, "Abandoned hold");
                Some(lease_id)
            }
        }
    }

    /// Applies the backend's reply to the request issued under `ticket`.
    ///
    /// Replies for any other ticket are ignored.
    pub fn apply_reply(&mut self, ticket: Ticket, reply: LeaseReply) -> HoldOutcome {
        let in_flight: InFlight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket == ticket => in_flight,
            other => {
                debug!(%ticket, ?reply, "Ignoring stale reply");
                self.in_flight = other;
                return HoldOutcome::Stale;
            }
        };

        match (in_flight.operation, reply) {
            (
                LeaseOperation::Create { .. } | LeaseOperation::Retarget { .. },
                LeaseReply::Granted {
                    lease_id,
                    shift_id,
                    expires_at,
                },
            ) => self.hold(lease_id, shift_id, expires_at),

            (LeaseOperation::Confirm { lease_id }, LeaseReply::Confirmed { .. }) => {
                self.reserve(lease_id)
            }

            (LeaseOperation::Create { shift_id }, LeaseReply::Rejected(rejection)) => {
                let failure = HoldFailure::from_rejection(rejection);
                warn!(%shift_id, %failure, "Hold request refused");
                HoldOutcome::Failed(failure)
            }

            (operation, LeaseReply::Rejected(rejection)) if rejection.leaves_lease_untouched() => {
                let failure = HoldFailure::from_rejection(rejection);
                warn!(
                    operation = operation.name(),
                    %failure,
                    "Request refused, hold kept"
                );
                if self.remaining_secs() == Some(0) {
                    return self.lose(HoldFailure::ExpiredLocally);
                }
                HoldOutcome::Failed(failure)
            }

            (
                LeaseOperation::Retarget { .. } | LeaseOperation::Confirm { .. },
                LeaseReply::Rejected(rejection),
            ) => self.lose(HoldFailure::from_rejection(rejection)),

            (operation, LeaseReply::Transient(message)) => {
                warn!(
                    operation = operation.name(),
                    %message,
                    "Lease request failed, state unchanged"
                );
                if self.remaining_secs() == Some(0) {
                    return self.lose(HoldFailure::ExpiredLocally);
                }
                HoldOutcome::Failed(HoldFailure::Transient(message))
            }

            (operation, reply) => {
                warn!(
                    operation = operation.name(),
                    ?reply,
                    "Reply does not match request"
                );
                if matches!(self.state, HoldState::Idle) {
                    HoldOutcome::Failed(HoldFailure::Transient(String::from(
                        "mismatched reply",
                    )))
                } else {
                    self.lose(HoldFailure::Diverged(LeaseRejection::InvalidState))
                }
            }
        }
    }

    const fn ensure_no_request_in_flight(&self) -> Result<(), HoldError> {
        match &self.in_flight {
            Some(in_flight) => Err(HoldError::RequestInFlight {
                ticket: in_flight.ticket,
            }),
            None => Ok(()),
        }
    }

    fn issue(&mut self, operation: LeaseOperation) -> LeaseRequest {
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket += 1;
        debug!(%ticket, operation = operation.name(), "Issuing lease request");
        self.in_flight = Some(InFlight {
            ticket,
            operation: operation.clone(),
        });
        LeaseRequest {
            ticket,
            holder: self.holder.clone(),
            operation,
        }
    }

    fn hold(
        &mut self,
        lease_id: LeaseId,
        shift_id: ShiftId,
        deadline: OffsetDateTime,
    ) -> HoldOutcome {
        let remaining_secs = whole_seconds_until(deadline, self.clock.now());
        info!(lease_id = %lease_id, %shift_id, remaining_secs, "Holding shift");
        self.state = HoldState::Holding {
            lease_id,
            shift_id: shift_id.clone(),
            deadline,
        };
        HoldOutcome::Holding {
            lease_id,
            shift_id,
            remaining_secs,
        }
    }

    fn reserve(&mut self, lease_id: LeaseId) -> HoldOutcome {
        match std::mem::replace(&mut self.state, HoldState::Idle) {
            HoldState::Holding { shift_id, .. } => {
                info!(lease_id = %lease_id, %shift_id, "Shift reserved");
                HoldOutcome::Reserved { lease_id, shift_id }
            }
            HoldState::Idle => HoldOutcome::Unchanged,
        }
    }

    fn lose(&mut self, failure: HoldFailure) -> HoldOutcome {
        self.in_flight = None;
        match std::mem::replace(&mut self.state, HoldState::Idle) {
            HoldState::Holding {
                lease_id, shift_id, ..
            } => {
                warn!(lease_id = %lease_id, %shift_id, %failure, "Hold lost");
                HoldOutcome::Lost { lease_id, failure }
            }
            HoldState::Idle => HoldOutcome::Failed(failure),
        }
    }
}

impl std::fmt::Debug for HoldCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldCoordinator")
            .field("holder", &self.holder)
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

fn whole_seconds_until(deadline: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let left: Duration = deadline - now;
    if left <= Duration::ZERO {
        return 0;
    }
    let whole = left.whole_seconds();
    if left.subsec_nanoseconds() > 0 {
        whole + 1
    } else {
        whole
    }
}
