// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{alice, at, bob, create_test_cause, hold, shift, t0};
use crate::{CoreError, LeaseStore, SWEEPER_ACTOR, TransitionResult};
use shift_hold_domain::{HolderId, Lease, LeaseId, LeaseStatus};
use time::Duration;

#[test]
fn test_sweep_before_deadline_changes_nothing() {
    let mut store: LeaseStore = LeaseStore::new();
    hold(&mut store, "X", &alice(), t0());

    let expired: Vec<Lease> = store.expire_sweep(at(59));

    assert!(expired.is_empty());
    assert!(store.claim_for(&shift("X"), at(59)).is_some());
}

#[test]
fn test_sweep_at_deadline_expires_and_frees_shift() {
    let mut store: LeaseStore = LeaseStore::new();
    let lease_id: LeaseId = hold(&mut store, "X", &alice(), t0());

    let expired: Vec<Lease> = store.expire_sweep(at(60));

    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].lease_id, lease_id);
    assert_eq!(expired[0].status, LeaseStatus::Expired);
    assert_eq!(store.get(lease_id).unwrap().status, LeaseStatus::Expired);
    assert!(store.is_available(&shift("X"), &bob(), at(60)));
}

#[test]
fn test_sweep_is_recorded_as_system_action() {
    let mut store: LeaseStore = LeaseStore::new();
    hold(&mut store, "X", &alice(), t0());

    store.expire_sweep(at(75));

    let last = store.audit_timeline().last().unwrap();
    assert_eq!(last.action.name, "ExpireLease");
    assert_eq!(last.actor.id, SWEEPER_ACTOR);
    assert_eq!(last.actor.actor_type, "system");
    assert_eq!(last.occurred_at, at(75));
}

#[test]
fn test_second_sweep_does_not_repeat_expiry() {
    let mut store: LeaseStore = LeaseStore::new();
    hold(&mut store, "X", &alice(), t0());

    assert_eq!(store.expire_sweep(at(60)).len(), 1);
    assert!(store.expire_sweep(at(120)).is_empty());
    assert_eq!(store.audit_timeline().len(), 2);
}

#[test]
fn test_confirmed_leases_never_expire() {
    let mut store: LeaseStore = LeaseStore::new();
    let lease_id: LeaseId = hold(&mut store, "X", &alice(), t0());
    store
        .confirm(lease_id, &alice(), create_test_cause(), at(59))
        .unwrap();

    let expired: Vec<Lease> = store.expire_sweep(at(3600));

    assert!(expired.is_empty());
    assert_eq!(store.get(lease_id).unwrap().status, LeaseStatus::Confirmed);
}

#[test]
fn test_confirm_one_millisecond_late_is_expired() {
    let mut store: LeaseStore = LeaseStore::new();
    let lease_id: LeaseId = hold(&mut store, "X", &alice(), t0());

    let result = store.confirm(
        lease_id,
        &alice(),
        create_test_cause(),
        at(60) + Duration::milliseconds(1),
    );

    assert_eq!(
        result,
        Err(CoreError::Expired {
            lease_id,
            expired_at: at(60),
        })
    );

    // The shift went back to the pool.
    let next: TransitionResult = store
        .create(shift("X"), bob(), create_test_cause(), at(61))
        .unwrap();
    assert_ne!(next.lease.lease_id, lease_id);
}

#[test]
fn test_confirm_one_millisecond_early_succeeds() {
    let mut store: LeaseStore = LeaseStore::new();
    let lease_id: LeaseId = hold(&mut store, "X", &alice(), t0());

    let result: TransitionResult = store
        .confirm(
            lease_id,
            &alice(),
            create_test_cause(),
            at(60) - Duration::milliseconds(1),
        )
        .unwrap();

    assert_eq!(result.lease.status, LeaseStatus::Confirmed);
}

#[test]
fn test_operation_reports_leases_expired_by_lazy_pass() {
    let mut store: LeaseStore = LeaseStore::new();
    let stale: LeaseId = hold(&mut store, "X", &alice(), t0());

    let result: TransitionResult = store
        .create(shift("X"), bob(), create_test_cause(), at(60))
        .unwrap();

    assert_eq!(result.expired.len(), 1);
    assert_eq!(result.expired[0].lease_id, stale);
}

#[test]
fn test_retarget_restarts_expiry_clock() {
    let mut store: LeaseStore = LeaseStore::new();
    let lease_id: LeaseId = hold(&mut store, "X", &alice(), t0());
    store
        .retarget(lease_id, &alice(), shift("Y"), create_test_cause(), at(50))
        .unwrap();

    assert!(store.expire_sweep(at(60)).is_empty());
    assert_eq!(store.expire_sweep(at(110)).len(), 1);
}

#[test]
fn test_claim_for_ignores_overdue_lease_before_sweep() {
    let mut store: LeaseStore = LeaseStore::new();
    hold(&mut store, "X", &alice(), t0());

    assert!(store.claim_for(&shift("X"), at(60)).is_none());
    assert!(store.is_available(&shift("X"), &bob(), at(60)));
}

#[test]
fn test_sweep_visits_only_claimed_leases_in_id_order() {
    let mut store: LeaseStore = LeaseStore::new();
    let released: LeaseId = hold(&mut store, "W", &alice(), t0());
    store
        .release(released, &alice(), create_test_cause(), at(1))
        .unwrap();
    let confirmed: LeaseId = hold(&mut store, "V", &bob(), t0());
    store
        .confirm(confirmed, &bob(), create_test_cause(), at(2))
        .unwrap();
    let z: LeaseId = hold(&mut store, "Z", &alice(), t0());
    let y: LeaseId = hold(&mut store, "Y", &bob(), t0());
    let x: LeaseId = hold(&mut store, "X", &HolderId::new("carol"), at(30));

    let expired: Vec<LeaseId> = store
        .expire_sweep(at(60))
        .iter()
        .map(|lease| lease.lease_id)
        .collect();

    assert_eq!(expired, vec![z, y]);
    assert_eq!(store.get(released).unwrap().status, LeaseStatus::Released);
    assert_eq!(store.get(confirmed).unwrap().status, LeaseStatus::Confirmed);
    assert_eq!(store.get(x).unwrap().status, LeaseStatus::Pending);
    assert!(store.claim_for(&shift("V"), at(60)).is_some());
    assert!(store.is_available(&shift("W"), &bob(), at(60)));
}
