// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;

use crate::{ChargePointId, Shift, ShiftId, StationId};

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-02 08:00:00 UTC)
}

pub fn create_test_shift(shift_id: &str) -> Shift {
    Shift {
        shift_id: ShiftId::new(shift_id),
        charging_point_id: ChargePointId::new("CP-1"),
        station_id: StationId::new("ST-A"),
        start_time: datetime!(2026-03-02 10:00:00 UTC),
        end_time: datetime!(2026-03-02 11:00:00 UTC),
        power_kw: 50,
        connector_type: String::from("CCS2"),
        location: String::from("Porto"),
    }
}
