// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{HoldCoordinator, HoldDriver, InProcessLeaseClient, LeaseReply};
use shift_hold::{LeaseStore, ManualClock};
use shift_hold_api::InMemoryShiftCatalog;
use shift_hold_domain::{ChargePointId, HolderId, LeaseId, Shift, ShiftId, StationId};
use std::sync::Arc;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-02 08:00:00 UTC)
}

pub fn at(secs: i64) -> OffsetDateTime {
    t0() + Duration::seconds(secs)
}

pub fn shift(id: &str) -> ShiftId {
    ShiftId::new(id)
}

pub fn create_test_coordinator(holder: &str) -> (HoldCoordinator, Arc<ManualClock>) {
    let clock: Arc<ManualClock> = Arc::new(ManualClock::new(t0()));
    (
        HoldCoordinator::new(HolderId::new(holder), clock.clone()),
        clock,
    )
}

pub fn granted(lease_id: i64, shift_id: &str, expires_at: OffsetDateTime) -> LeaseReply {
    LeaseReply::Granted {
        lease_id: LeaseId::new(lease_id),
        shift_id: shift(shift_id),
        expires_at,
    }
}

fn create_test_shift(shift_id: &str, start: OffsetDateTime) -> Shift {
    Shift {
        shift_id: ShiftId::new(shift_id),
        charging_point_id: ChargePointId::new("ST-A-CP1"),
        station_id: StationId::new("ST-A"),
        start_time: start,
        end_time: start + Duration::hours(1),
        power_kw: 50,
        connector_type: String::from("CCS2"),
        location: String::from("Porto"),
    }
}

/// A backend holding shifts X and Y, shared by every session built on it.
pub struct TestBackend {
    pub store: Arc<Mutex<LeaseStore>>,
    pub client: Arc<InProcessLeaseClient>,
    pub clock: Arc<ManualClock>,
}

impl TestBackend {
    pub fn start() -> Self {
        let catalog = InMemoryShiftCatalog::new(vec![
            create_test_shift("X", datetime!(2026-03-02 10:00:00 UTC)),
            create_test_shift("Y", datetime!(2026-03-02 11:00:00 UTC)),
        ])
        .unwrap();
        let clock: Arc<ManualClock> = Arc::new(ManualClock::new(t0()));
        let store: Arc<Mutex<LeaseStore>> = Arc::new(Mutex::new(LeaseStore::new()));
        let client = Arc::new(InProcessLeaseClient::new(
            Arc::clone(&store),
            Arc::new(catalog),
            clock.clone(),
        ));
        Self {
            store,
            client,
            clock,
        }
    }

    pub fn session(&self, holder: &str) -> HoldDriver<InProcessLeaseClient> {
        HoldDriver::new(
            HoldCoordinator::new(HolderId::new(holder), self.clock.clone()),
            Arc::clone(&self.client),
        )
    }

    pub fn set_elapsed(&self, secs: i64) {
        self.clock.set(at(secs));
    }
}
