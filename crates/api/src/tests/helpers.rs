// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use shift_hold_audit::Cause;
use shift_hold_domain::{ChargePointId, Shift, ShiftId, StationId};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{CreateLeaseRequest, InMemoryShiftCatalog};

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-02 08:00:00 UTC)
}

pub fn at(seconds: i64) -> OffsetDateTime {
    t0() + Duration::seconds(seconds)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-1"), String::from("API request"))
}

pub fn create_test_shift(
    shift_id: &str,
    station: &str,
    start_hour: u8,
    power_kw: u32,
    connector: &str,
) -> Shift {
    let start: OffsetDateTime = datetime!(2026-03-02 00:00:00 UTC)
        .replace_hour(start_hour)
        .unwrap();
    Shift {
        shift_id: ShiftId::new(shift_id),
        charging_point_id: ChargePointId::new(&format!("{station}-CP1")),
        station_id: StationId::new(station),
        start_time: start,
        end_time: start + Duration::hours(1),
        power_kw,
        connector_type: String::from(connector),
        location: String::from("Porto"),
    }
}

/// Three shifts: X (ST-A, 10:00, 50 kW CCS2), Y (ST-B, 09:00, 22 kW Type2),
/// Z (ST-A, 12:00, 150 kW CCS2).
pub fn create_test_catalog() -> InMemoryShiftCatalog {
    InMemoryShiftCatalog::new(vec![
        create_test_shift("X", "ST-A", 10, 50, "CCS2"),
        create_test_shift("Y", "ST-B", 9, 22, "Type2"),
        create_test_shift("Z", "ST-A", 12, 150, "CCS2"),
    ])
    .unwrap()
}

pub fn create_request(shift_id: &str, holder: &str) -> CreateLeaseRequest {
    CreateLeaseRequest {
        shift_id: String::from(shift_id),
        holder: String::from(holder),
    }
}
