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

mod error;
mod lease;
mod preference;
mod shift;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use lease::{HOLD_WINDOW, HOLD_WINDOW_SECS, Lease, LeaseStatus};
pub use preference::{Preference, count_matching_preferences};
pub use shift::{Shift, ShiftListing};
pub use types::{ChargePointId, HolderId, LeaseId, ShiftId, StationId};
pub use validation::{validate_holder, validate_preference, validate_shift};
