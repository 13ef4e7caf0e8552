// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_shift;
use crate::{Preference, count_matching_preferences};

#[test]
fn test_preference_fields_are_wildcards_when_unset() {
    let shift = create_test_shift("S1");
    let pref = Preference {
        connector_type: Some(String::from("ccs2")),
        ..Preference::default()
    };

    assert!(pref.matches(&shift));
}

#[test]
fn test_preference_requires_every_constrained_field() {
    let shift = create_test_shift("S1");
    let pref = Preference {
        station_id: Some(String::from("ST-A")),
        location: Some(String::from("Lisbon")),
        ..Preference::default()
    };

    assert!(!pref.matches(&shift));
}

#[test]
fn test_power_is_a_minimum() {
    let shift = create_test_shift("S1");

    let enough = Preference {
        min_power_kw: Some(50),
        ..Preference::default()
    };
    let too_much = Preference {
        min_power_kw: Some(51),
        ..Preference::default()
    };

    assert!(enough.matches(&shift));
    assert!(!too_much.matches(&shift));
}

#[test]
fn test_blank_strings_are_treated_as_unset() {
    let pref = Preference {
        station_id: Some(String::from("  ")),
        ..Preference::default()
    };

    assert!(pref.is_empty());
    assert!(pref.matches(&create_test_shift("S1")));
}

#[test]
fn test_count_matching_preferences() {
    let shift = create_test_shift("S1");
    let prefs = vec![
        Preference {
            location: Some(String::from("porto")),
            ..Preference::default()
        },
        Preference {
            connector_type: Some(String::from("Type2")),
            ..Preference::default()
        },
        Preference {
            station_id: Some(String::from("st-a")),
            min_power_kw: Some(22),
            ..Preference::default()
        },
    ];

    assert_eq!(count_matching_preferences(&shift, &prefs), 2);
    assert_eq!(count_matching_preferences(&shift, &[]), 0);
}
