// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{HolderId, LeaseId, ShiftId};

#[test]
fn test_holder_is_normalized() {
    let holder: HolderId = HolderId::new("  Alice ");
    assert_eq!(holder.value(), "alice");
    assert_eq!(holder, HolderId::new("ALICE"));
}

#[test]
fn test_shift_id_is_trimmed_but_case_preserved() {
    let shift_id: ShiftId = ShiftId::new(" Shift-7 ");
    assert_eq!(shift_id.value(), "Shift-7");
    assert_ne!(shift_id, ShiftId::new("shift-7"));
}

#[test]
fn test_ids_serialize_transparently() {
    let json = serde_json::to_string(&LeaseId::new(42)).unwrap();
    assert_eq!(json, "42");

    let json = serde_json::to_string(&ShiftId::new("S1")).unwrap();
    assert_eq!(json, "\"S1\"");

    let holder: HolderId = serde_json::from_str("\" Bob \"").unwrap();
    assert_eq!(holder, HolderId::new("bob"));
}

#[test]
fn test_deserialized_shift_id_is_trimmed_like_new() {
    let shift_id: ShiftId = serde_json::from_str("\"  S1 \"").unwrap();

    assert_eq!(shift_id, ShiftId::new("S1"));
    assert_eq!(serde_json::to_string(&shift_id).unwrap(), "\"S1\"");
}

#[test]
fn test_lease_id_display() {
    assert_eq!(LeaseId::new(7).to_string(), "7");
}
