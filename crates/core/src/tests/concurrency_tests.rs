// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_cause, shift, t0};
use crate::{CoreError, LeaseStore};
use shift_hold_domain::HolderId;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[test]
fn test_racing_creates_have_exactly_one_winner() {
    const RACERS: usize = 16;

    let store: Arc<Mutex<LeaseStore>> = Arc::new(Mutex::new(LeaseStore::new()));
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(RACERS));

    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let holder: HolderId = HolderId::new(&format!("holder-{i}"));
                barrier.wait();
                store
                    .lock()
                    .unwrap()
                    .create(shift("X"), holder, create_test_cause(), t0())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(CoreError::Conflict { .. })))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(conflicts, RACERS - 1);
    assert_eq!(store.lock().unwrap().leases().count(), 1);
}
