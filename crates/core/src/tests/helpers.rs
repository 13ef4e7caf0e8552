// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_hold_audit::Cause;
use shift_hold_domain::{HolderId, Lease, LeaseId, ShiftId};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::LeaseStore;

/// The instant every scenario starts at.
pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-02 08:00:00 UTC)
}

/// `t0` plus whole seconds.
pub fn at(seconds: i64) -> OffsetDateTime {
    t0() + Duration::seconds(seconds)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Holder request"))
}

pub fn alice() -> HolderId {
    HolderId::new("alice")
}

pub fn bob() -> HolderId {
    HolderId::new("bob")
}

pub fn shift(id: &str) -> ShiftId {
    ShiftId::new(id)
}

/// Creates a lease that must succeed and returns its id.
pub fn hold(store: &mut LeaseStore, shift_id: &str, holder: &HolderId, now: OffsetDateTime) -> LeaseId {
    store
        .create(shift(shift_id), holder.clone(), create_test_cause(), now)
        .expect("create should succeed")
        .lease
        .lease_id
}

/// Asserts that no shift is claimed by two leases.
pub fn assert_single_claim_per_shift(store: &LeaseStore, now: OffsetDateTime) {
    let claiming: Vec<&Lease> = store
        .leases()
        .filter(|lease| lease.claims_shift(now))
        .collect();
    for (i, a) in claiming.iter().enumerate() {
        for b in &claiming[i + 1..] {
            assert_ne!(
                a.shift_id, b.shift_id,
                "leases {} and {} both claim {}",
                a.lease_id, b.lease_id, a.shift_id
            );
        }
    }
}
