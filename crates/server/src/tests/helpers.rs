// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use shift_hold::ManualClock;
use shift_hold_api::InMemoryShiftCatalog;
use shift_hold_domain::{ChargePointId, Shift, ShiftId, StationId};
use std::sync::Arc;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use crate::{AppState, build_router};

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-02 08:00:00 UTC)
}

fn create_test_shift(shift_id: &str, station: &str, start: OffsetDateTime, power_kw: u32) -> Shift {
    Shift {
        shift_id: ShiftId::new(shift_id),
        charging_point_id: ChargePointId::new(&format!("{station}-CP1")),
        station_id: StationId::new(station),
        start_time: start,
        end_time: start + Duration::hours(1),
        power_kw,
        connector_type: String::from("CCS2"),
        location: String::from("Porto"),
    }
}

/// App state with shifts X (ST-A, 50 kW, 10:00) and Y (ST-B, 150 kW,
/// 11:00) and a clock frozen at `t0`.
pub fn create_test_app_state() -> (AppState, Arc<ManualClock>) {
    let catalog: InMemoryShiftCatalog = InMemoryShiftCatalog::new(vec![
        create_test_shift("X", "ST-A", datetime!(2026-03-02 10:00:00 UTC), 50),
        create_test_shift("Y", "ST-B", datetime!(2026-03-02 11:00:00 UTC), 150),
    ])
    .expect("test catalog is valid");
    let clock: Arc<ManualClock> = Arc::new(ManualClock::new(t0()));
    (AppState::new(catalog, clock.clone()), clock)
}

pub fn create_test_app() -> (AppState, Router, Arc<ManualClock>) {
    let (app_state, clock) = create_test_app_state();
    let app: Router = build_router(app_state.clone());
    (app_state, app, clock)
}

pub async fn post_json<T: Serialize>(app: &Router, uri: &str, body: &T) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}
