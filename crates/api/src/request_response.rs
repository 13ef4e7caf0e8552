// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These are the wire contract shared by the server and the HTTP lease
//! client. Identifiers travel as plain strings and integers.

use crate::error::{ApiError, ErrorKind};
use serde::{Deserialize, Serialize};
use shift_hold_audit::AuditEvent;
use shift_hold_domain::{Lease, LeaseStatus, Preference, ShiftListing};
use time::OffsetDateTime;

/// API request to claim a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLeaseRequest {
    /// The shift to claim.
    pub shift_id: String,
    /// The claiming holder.
    pub holder: String,
}

/// API request to move a pending lease to another shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetargetLeaseRequest {
    /// The holder of the lease.
    pub holder: String,
    /// The new target shift.
    pub shift_id: String,
}

/// API request to confirm or release a lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRequest {
    /// The holder of the lease.
    pub holder: String,
}

/// API response for a granted or retargeted lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseResponse {
    /// The lease identifier.
    pub lease_id: i64,
    /// The shift now held.
    pub shift_id: String,
    /// When the hold window closes.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// API response for a confirmed lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmLeaseResponse {
    /// The lease identifier.
    pub lease_id: i64,
    /// When the lease was confirmed.
    #[serde(with = "time::serde::rfc3339")]
    pub confirmed_at: OffsetDateTime,
}

/// API response for a released lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseLeaseResponse {
    /// The lease identifier.
    pub lease_id: i64,
}

/// Full view of one lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseView {
    /// The lease identifier.
    pub lease_id: i64,
    /// The targeted shift.
    pub shift_id: String,
    /// The holder.
    pub holder: String,
    /// Current status.
    pub status: LeaseStatus,
    /// Start of the current hold window.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// End of the current hold window.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    /// When the lease was confirmed, if it was.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub confirmed_at: Option<OffsetDateTime>,
    /// Whole seconds left in the hold window.
    pub remaining_secs: i64,
}

impl LeaseView {
    /// Builds a view of `lease` as seen at `now`.
    ///
    /// A pending lease past its deadline reads as expired even if no
    /// sweep has recorded it yet.
    #[must_use]
    pub fn from_lease(lease: &Lease, now: OffsetDateTime) -> Self {
        let status: LeaseStatus = if lease.is_overdue(now) {
            LeaseStatus::Expired
        } else {
            lease.status
        };
        Self {
            lease_id: lease.lease_id.value(),
            shift_id: lease.shift_id.value().to_string(),
            holder: lease.holder.value().to_string(),
            status,
            created_at: lease.created_at,
            expires_at: lease.expires_at,
            confirmed_at: lease.confirmed_at,
            remaining_secs: lease.remaining(now).whole_seconds(),
        }
    }
}

/// API response listing bookable shifts for a holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListShiftsResponse {
    /// The holder the listing was computed for.
    pub holder: String,
    /// Shifts, best preference match first.
    pub shifts: Vec<ShiftListing>,
}

/// API request to record a preference for a holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPreferenceRequest {
    /// The holder the preference belongs to.
    pub holder: String,
    /// The preference itself.
    #[serde(flatten)]
    pub preference: Preference,
}

/// API response listing a holder's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesResponse {
    /// The holder.
    pub holder: String,
    /// Recorded preferences, oldest first.
    pub preferences: Vec<Preference>,
}

/// API response for the audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    /// Events in the order they were recorded.
    pub events: Vec<AuditEvent>,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always true.
    pub error: bool,
    /// Machine-readable category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: true,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
