// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_hold_api::{CreateLeaseRequest, HolderRequest};
use time::Duration;

use crate::live::LiveEvent;
use crate::sweep_once;

use super::helpers::{create_test_app, post_json};

fn create(shift_id: &str, holder: &str) -> CreateLeaseRequest {
    CreateLeaseRequest {
        shift_id: String::from(shift_id),
        holder: String::from(holder),
    }
}

#[tokio::test]
async fn test_create_and_confirm_are_broadcast() {
    let (state, app, _clock) = create_test_app();
    let mut rx = state.live_events.subscribe();

    post_json(&app, "/leases", &create("X", "alice")).await;
    post_json(
        &app,
        "/leases/1/confirm",
        &HolderRequest {
            holder: String::from("alice"),
        },
    )
    .await;

    assert_eq!(
        rx.try_recv().unwrap(),
        LiveEvent::ShiftHeld {
            shift_id: String::from("X"),
            lease_id: 1,
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        LiveEvent::ShiftReserved {
            shift_id: String::from("X"),
            lease_id: 1,
        }
    );
}

#[tokio::test]
async fn test_rejected_request_still_broadcasts_expiry() {
    let (state, app, clock) = create_test_app();
    post_json(&app, "/leases", &create("X", "alice")).await;
    let mut rx = state.live_events.subscribe();
    clock.advance(Duration::seconds(61));

    // Unknown shift: rejected, but the expiry pass ran first
    post_json(&app, "/leases", &create("NOPE", "bob")).await;

    assert_eq!(
        rx.try_recv().unwrap(),
        LiveEvent::ShiftReleased {
            shift_id: String::from("X"),
            lease_id: 1,
        }
    );
}

#[tokio::test]
async fn test_sweep_once_broadcasts_expired_shifts() {
    let (state, app, clock) = create_test_app();
    post_json(&app, "/leases", &create("X", "alice")).await;
    let mut rx = state.live_events.subscribe();

    clock.advance(Duration::seconds(30));
    sweep_once(&state).await;
    assert!(rx.try_recv().is_err());

    clock.advance(Duration::seconds(30));
    sweep_once(&state).await;
    assert!(matches!(
        rx.try_recv().unwrap(),
        LiveEvent::ShiftReleased { ref shift_id, lease_id: 1 } if shift_id == "X"
    ));
}
