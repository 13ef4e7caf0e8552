// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lease (pre-reservation) types.
//!
//! A lease is a time-bounded exclusive claim on one shift by one holder.
//!
//! ## Invariants
//!
//! - `expires_at` is exactly `created_at + HOLD_WINDOW`, where `created_at`
//!   is the instant of creation or of the most recent retarget
//! - A lease is overdue from the instant `now >= expires_at`
//! - Only `pending` and `confirmed` leases claim their shift
//! - Confirmed leases never become overdue

use crate::error::DomainError;
use crate::types::{HolderId, LeaseId, ShiftId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Length of the hold window in seconds.
pub const HOLD_WINDOW_SECS: i64 = 60;

/// The fixed interval during which a pending lease must be confirmed.
pub const HOLD_WINDOW: Duration = Duration::seconds(HOLD_WINDOW_SECS);

/// Lease status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    /// Claimed, awaiting confirmation within the hold window.
    Pending,
    /// Confirmed before the window elapsed. Permanent.
    Confirmed,
    /// The hold window elapsed without confirmation.
    Expired,
    /// Released by the backend before the window elapsed.
    Released,
}

impl LeaseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Expired => "expired",
            Self::Released => "released",
        }
    }

    /// Returns true if a lease in this status excludes other holders from
    /// its shift.
    #[must_use]
    pub const fn claims_shift(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns true if this status can never change again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for LeaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "expired" => Ok(Self::Expired),
            "released" => Ok(Self::Released),
            _ => Err(DomainError::InvalidLeaseStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-bounded exclusive claim on one shift by one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    /// Identifier assigned by the lease store.
    pub lease_id: LeaseId,
    /// The shift currently targeted.
    pub shift_id: ShiftId,
    /// The identity holding the claim.
    pub holder: HolderId,
    /// Current status.
    pub status: LeaseStatus,
    /// Instant of creation or of the most recent retarget.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Instant the hold window closes.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    /// Instant of confirmation, if confirmed.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub confirmed_at: Option<OffsetDateTime>,
}

impl Lease {
    /// Creates a new pending lease whose window opens at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if `now + HOLD_WINDOW` is not representable.
    pub fn pending(
        lease_id: LeaseId,
        shift_id: ShiftId,
        holder: HolderId,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            lease_id,
            shift_id,
            holder,
            status: LeaseStatus::Pending,
            created_at: now,
            expires_at: hold_deadline(now)?,
            confirmed_at: None,
        })
    }

    /// Moves the lease to another shift and restarts its window at `now`.
    ///
    /// The identifier is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if `now + HOLD_WINDOW` is not representable.
    pub fn retarget(&mut self, shift_id: ShiftId, now: OffsetDateTime) -> Result<(), DomainError> {
        self.expires_at = hold_deadline(now)?;
        self.created_at = now;
        self.shift_id = shift_id;
        Ok(())
    }

    /// Returns true if the lease is pending and its window has elapsed.
    #[must_use]
    pub fn is_overdue(&self, now: OffsetDateTime) -> bool {
        self.status == LeaseStatus::Pending && now >= self.expires_at
    }

    /// Returns true if the lease currently excludes others from its shift.
    #[must_use]
    pub fn claims_shift(&self, now: OffsetDateTime) -> bool {
        self.status.claims_shift() && !self.is_overdue(now)
    }

    /// Returns the time left in the hold window, clamped at zero.
    ///
    /// Confirmed and terminal leases have no remaining window.
    #[must_use]
    pub fn remaining(&self, now: OffsetDateTime) -> Duration {
        if self.status != LeaseStatus::Pending || now >= self.expires_at {
            return Duration::ZERO;
        }
        self.expires_at - now
    }
}

/// Computes the deadline of a window opening at `opened_at`.
fn hold_deadline(opened_at: OffsetDateTime) -> Result<OffsetDateTime, DomainError> {
    opened_at
        .checked_add(HOLD_WINDOW)
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: String::from("computing the hold deadline"),
        })
}
