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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! The authoritative lease store.
//!
//! The store owns every pre-reservation lease and is the only place that
//! decides whether a shift is claimed. Clients only ever hold a cached view.
//!
//! ## Invariants
//!
//! - For every shift, at most one lease is `pending` or `confirmed`
//! - First create wins; a create against a claimed shift fails with `Conflict`
//! - A pending lease expires at `created_at + HOLD_WINDOW` whether or not any
//!   client observes it
//! - A retarget moves the claim atomically; the old shift is free the moment
//!   the new one is taken
//!
//! All operations take `now` explicitly. Callers that share a store between
//! tasks must serialize access (the server wraps it in a mutex), which makes
//! every claim check-and-write a single critical section.

mod clock;
mod command;
mod error;
mod state;
mod store;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::LeaseCommand;
pub use error::CoreError;
pub use state::{Transition, TransitionResult};
pub use store::{LeaseStore, SWEEPER_ACTOR};
