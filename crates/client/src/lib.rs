// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client side of the shift hold workflow.
//!
//! The [`HoldCoordinator`] owns the single lease a session may hold. It is a
//! synchronous state machine: `select`, `confirm` and `tick` are plain
//! method calls that return the backend request to run (if any), and
//! replies come back through `apply_reply`. Nothing here sleeps or performs
//! I/O. The [`HoldDriver`] runs a coordinator against a [`LeaseClient`] on
//! tokio with a one-second countdown.
//!
//! The backend is authoritative. The local countdown only mirrors the
//! deadline the store handed out and never overrides a backend verdict.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod coordinator;
mod driver;
mod error;
mod protocol;
mod transport;

#[cfg(test)]
mod tests;

pub use coordinator::{HoldCoordinator, HoldFailure, HoldOutcome, HoldState};
pub use driver::{DriverEvent, HoldCommand, HoldDriver, TICK_INTERVAL};
pub use error::{HoldError, TransportError};
pub use protocol::{LeaseOperation, LeaseRejection, LeaseReply, LeaseRequest, Ticket};
pub use transport::{HttpLeaseClient, InProcessLeaseClient, LeaseClient};
