// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{ChargePointId, ShiftId, StationId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A bookable unit of charging time on one charging point.
///
/// Shifts are immutable from the coordinator's point of view; only the
/// backend decides availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// The shift identifier.
    pub shift_id: ShiftId,
    /// The charging point this shift runs on.
    pub charging_point_id: ChargePointId,
    /// The station hosting the charging point.
    pub station_id: StationId,
    /// Start of the charging window.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// End of the charging window.
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Power rating in kilowatts.
    pub power_kw: u32,
    /// Connector type (e.g., "CCS2", "Type2").
    pub connector_type: String,
    /// Human readable location.
    pub location: String,
}

/// A shift as presented to one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftListing {
    /// The shift itself.
    #[serde(flatten)]
    pub shift: Shift,
    /// How many of the holder's saved preferences this shift matches.
    pub matching_preferences: u32,
    /// False when another holder currently claims the shift.
    pub available: bool,
}
