// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tokio runner for a [`HoldCoordinator`].

use crate::coordinator::{HoldCoordinator, HoldOutcome};
use crate::error::HoldError;
use crate::protocol::{LeaseReply, LeaseRequest, Ticket};
use crate::transport::LeaseClient;
use shift_hold_domain::{LeaseId, ShiftId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Cadence of the local countdown.
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// User intents fed into a running driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldCommand {
    /// Pick a shift.
    Select(ShiftId),
    /// Confirm the held shift.
    Confirm,
    /// Walk away from the held shift without releasing it.
    Abandon,
}

/// Everything a running driver reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// A coordinator step produced an outcome.
    Outcome(HoldOutcome),
    /// A command was refused without contacting the backend.
    Refused(HoldError),
    /// The session dropped its hold locally.
    Abandoned(Option<LeaseId>),
}

/// Couples a coordinator with a lease client.
pub struct HoldDriver<L> {
    coordinator: HoldCoordinator,
    client: Arc<L>,
}

impl<L: LeaseClient + 'static> HoldDriver<L> {
    /// Creates a driver.
    #[must_use]
    pub const fn new(coordinator: HoldCoordinator, client: Arc<L>) -> Self {
        Self {
            coordinator,
            client,
        }
    }

    /// The wrapped coordinator.
    #[must_use]
    pub const fn coordinator(&self) -> &HoldCoordinator {
        &self.coordinator
    }

    /// Selects a shift and waits for the backend's verdict.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's refusal, if any.
    pub async fn select(&mut self, shift_id: ShiftId) -> Result<HoldOutcome, HoldError> {
        match self.coordinator.select(shift_id)? {
            Some(request) => Ok(self.complete(request).await),
            None => Ok(HoldOutcome::Unchanged),
        }
    }

    /// Confirms the held shift and waits for the backend's verdict.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's refusal, if any.
    pub async fn confirm(&mut self) -> Result<HoldOutcome, HoldError> {
        let request: LeaseRequest = self.coordinator.confirm()?;
        Ok(self.complete(request).await)
    }

    /// Advances the countdown once.
    pub fn tick(&mut self) -> HoldOutcome {
        self.coordinator.tick()
    }

    async fn complete(&mut self, request: LeaseRequest) -> HoldOutcome {
        let reply: LeaseReply = self.client.execute(&request).await;
        self.coordinator.apply_reply(request.ticket, reply)
    }

    fn dispatch(&self, requests: &mut JoinSet<(Ticket, LeaseReply)>, request: LeaseRequest) {
        let client: Arc<L> = Arc::clone(&self.client);
        requests.spawn(async move {
            let reply: LeaseReply = client.execute(&request).await;
            (request.ticket, reply)
        });
    }

    /// Runs the session until `commands` closes or `events` is dropped.
    ///
    /// Requests execute in the background so the countdown keeps ticking
    /// while a reply is outstanding. Requests are never cancelled: after an
    /// abandon their replies still arrive and are reported as stale. On
    /// shutdown outstanding requests are left to finish on their own.
    /// Returns the coordinator so callers can inspect the final state.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<HoldCommand>,
        events: mpsc::Sender<DriverEvent>,
    ) -> HoldCoordinator {
        info!(holder = %self.coordinator.holder(), "Hold driver started");

        let mut countdown = tokio::time::interval(TICK_INTERVAL);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut requests: JoinSet<(Ticket, LeaseReply)> = JoinSet::new();

        loop {
            let event: Option<DriverEvent> = tokio::select! {
                _ = countdown.tick() => match self.coordinator.tick() {
                    HoldOutcome::Unchanged => None,
                    outcome => Some(DriverEvent::Outcome(outcome)),
                },
                Some(joined) = requests.join_next(), if !requests.is_empty() => match joined {
                    Ok((ticket, reply)) => {
                        Some(DriverEvent::Outcome(self.coordinator.apply_reply(ticket, reply)))
                    }
                    Err(e) => {
                        error!(error = %e, "Lease request task failed");
                        None
                    }
                },
                command = commands.recv() => match command {
                    None => break,
                    Some(HoldCommand::Select(shift_id)) => match self.coordinator.select(shift_id) {
                        Ok(Some(request)) => {
                            self.dispatch(&mut requests, request);
                            None
                        }
                        Ok(None) => Some(DriverEvent::Outcome(HoldOutcome::Unchanged)),
                        Err(e) => Some(DriverEvent::Refused(e)),
                    },
                    Some(HoldCommand::Confirm) => match self.coordinator.confirm() {
                        Ok(request) => {
                            self.dispatch(&mut requests, request);
                            None
                        }
                        Err(e) => Some(DriverEvent::Refused(e)),
                    },
                    Some(HoldCommand::Abandon) => {
                        Some(DriverEvent::Abandoned(self.coordinator.abandon()))
                    }
                },
            };

            if let Some(event) = event
                && events.send(event).await.is_err()
            {
                debug!("Event receiver dropped, stopping hold driver");
                break;
            }
        }

        if !requests.is_empty() {
            debug!(outstanding = requests.len(), "Leaving outstanding requests to finish");
            requests.detach_all();
        }
        info!(holder = %self.coordinator.holder(), "Hold driver stopped");
        self.coordinator
    }
}

impl<L> std::fmt::Debug for HoldDriver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldDriver")
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}
