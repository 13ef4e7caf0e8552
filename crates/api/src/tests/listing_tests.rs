// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_hold::LeaseStore;
use shift_hold_domain::Preference;

use crate::{
    AddPreferenceRequest, ApiError, InMemoryShiftCatalog, ListShiftsResponse,
    PreferencesResponse, add_preference, create_lease, list_preferences, list_shifts,
};

use super::helpers::{at, create_request, create_test_catalog, create_test_cause, t0};

fn add(catalog: &mut InMemoryShiftCatalog, holder: &str, preference: Preference) {
    add_preference(
        catalog,
        AddPreferenceRequest {
            holder: String::from(holder),
            preference,
        },
    )
    .unwrap();
}

fn ids(response: &ListShiftsResponse) -> Vec<&str> {
    response
        .shifts
        .iter()
        .map(|listing| listing.shift.shift_id.value())
        .collect()
}

#[test]
fn test_without_preferences_shifts_sort_by_start_time() {
    let catalog = create_test_catalog();
    let store: LeaseStore = LeaseStore::new();

    let response: ListShiftsResponse = list_shifts(&catalog, &store, "alice", t0()).unwrap();

    assert_eq!(ids(&response), vec!["Y", "X", "Z"]);
    assert!(response.shifts.iter().all(|s| s.matching_preferences == 0));
}

#[test]
fn test_best_matches_come_first() {
    let mut catalog = create_test_catalog();
    add(
        &mut catalog,
        "alice",
        Preference {
            connector_type: Some(String::from("CCS2")),
            ..Preference::default()
        },
    );
    add(
        &mut catalog,
        "alice",
        Preference {
            min_power_kw: Some(100),
            ..Preference::default()
        },
    );
    let store: LeaseStore = LeaseStore::new();

    let response: ListShiftsResponse = list_shifts(&catalog, &store, "alice", t0()).unwrap();

    assert_eq!(ids(&response), vec!["Z", "X", "Y"]);
    let counts: Vec<u32> = response
        .shifts
        .iter()
        .map(|s| s.matching_preferences)
        .collect();
    assert_eq!(counts, vec![2, 1, 0]);
}

#[test]
fn test_availability_reflects_other_holders_claims() {
    let catalog = create_test_catalog();
    let mut store: LeaseStore = LeaseStore::new();
    create_lease(
        &mut store,
        &catalog,
        &create_request("X", "alice"),
        create_test_cause(),
        t0(),
    )
    .unwrap();

    let for_bob: ListShiftsResponse = list_shifts(&catalog, &store, "bob", at(10)).unwrap();
    let for_alice: ListShiftsResponse = list_shifts(&catalog, &store, "alice", at(10)).unwrap();
    let after_expiry: ListShiftsResponse = list_shifts(&catalog, &store, "bob", at(60)).unwrap();

    let available = |r: &ListShiftsResponse, id: &str| {
        r.shifts
            .iter()
            .find(|s| s.shift.shift_id.value() == id)
            .unwrap()
            .available
    };
    assert!(!available(&for_bob, "X"));
    assert!(available(&for_bob, "Y"));
    assert!(available(&for_alice, "X"));
    assert!(available(&after_expiry, "X"));
}

#[test]
fn test_list_shifts_rejects_blank_holder() {
    let catalog = create_test_catalog();
    let store: LeaseStore = LeaseStore::new();

    let result = list_shifts(&catalog, &store, "  ", t0());

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_add_and_list_preferences() {
    let mut catalog = create_test_catalog();
    add(
        &mut catalog,
        "Alice",
        Preference {
            station_id: Some(String::from("ST-A")),
            ..Preference::default()
        },
    );

    let response: PreferencesResponse = list_preferences(&catalog, "alice").unwrap();

    assert_eq!(response.holder, "alice");
    assert_eq!(response.preferences.len(), 1);
}

#[test]
fn test_add_empty_preference_is_rejected() {
    let mut catalog = create_test_catalog();

    let result = add_preference(
        &mut catalog,
        AddPreferenceRequest {
            holder: String::from("alice"),
            preference: Preference::default(),
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "preference"
    ));
}
