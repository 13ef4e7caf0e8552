// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use shift_hold_api::{
    AddPreferenceRequest, AuditTimelineResponse, CreateLeaseRequest, HolderRequest,
    ListShiftsResponse, PreferencesResponse,
};
use shift_hold_domain::Preference;

use super::helpers::{create_test_app, get, post_json, read_json};

#[tokio::test]
async fn test_list_shifts_marks_held_shift_unavailable_for_others() {
    let (_state, app, _clock) = create_test_app();
    post_json(
        &app,
        "/leases",
        &CreateLeaseRequest {
            shift_id: String::from("X"),
            holder: String::from("alice"),
        },
    )
    .await;

    let response = get(&app, "/shifts?holder=bob").await;

    assert_eq!(response.status(), StatusCode::OK);
    let listing: ListShiftsResponse = read_json(response).await;
    assert_eq!(listing.holder, "bob");
    let x = listing
        .shifts
        .iter()
        .find(|s| s.shift.shift_id.value() == "X")
        .unwrap();
    assert!(!x.available);
}

#[tokio::test]
async fn test_preferences_drive_shift_ranking() {
    let (_state, app, _clock) = create_test_app();

    let added = post_json(
        &app,
        "/preferences",
        &AddPreferenceRequest {
            holder: String::from("alice"),
            preference: Preference {
                min_power_kw: Some(100),
                ..Preference::default()
            },
        },
    )
    .await;
    assert_eq!(added.status(), StatusCode::OK);

    let prefs: PreferencesResponse = read_json(get(&app, "/preferences?holder=alice").await).await;
    assert_eq!(prefs.preferences.len(), 1);

    let listing: ListShiftsResponse = read_json(get(&app, "/shifts?holder=alice").await).await;
    assert_eq!(listing.shifts[0].shift.shift_id.value(), "Y");
    assert_eq!(listing.shifts[0].matching_preferences, 1);
    assert_eq!(listing.shifts[1].matching_preferences, 0);
}

#[tokio::test]
async fn test_empty_preference_is_bad_request() {
    let (_state, app, _clock) = create_test_app();

    let response = post_json(
        &app,
        "/preferences",
        &AddPreferenceRequest {
            holder: String::from("alice"),
            preference: Preference::default(),
        },
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_timeline_records_transitions() {
    let (_state, app, _clock) = create_test_app();
    post_json(
        &app,
        "/leases",
        &CreateLeaseRequest {
            shift_id: String::from("X"),
            holder: String::from("alice"),
        },
    )
    .await;
    post_json(
        &app,
        "/leases/1/confirm",
        &HolderRequest {
            holder: String::from("alice"),
        },
    )
    .await;

    let timeline: AuditTimelineResponse = read_json(get(&app, "/audit/timeline").await).await;

    let names: Vec<&str> = timeline
        .events
        .iter()
        .map(|e| e.action.name.as_str())
        .collect();
    assert_eq!(names, vec!["CreateLease", "ConfirmLease"]);
    assert_eq!(timeline.events[0].cause.description, "Select shift");
    assert_ne!(timeline.events[0].cause.id, timeline.events[1].cause.id);
}
