// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::item::Item;
use std::cmp::Ordering;
use yare::parameterized;

#[parameterized(
    equal = { "100", "100", Ordering::Equal },
    shorter_is_less = { "99", "100", Ordering::Less },
    longer_is_greater = { "1000", "999", Ordering::Greater },
    lexicographic_same_length = { "123", "124", Ordering::Less },
    zero_vs_one = { "0", "1", Ordering::Less },
    huge_counters = {
        "340282366920938463463374607431768211456",
        "340282366920938463463374607431768211455",
        Ordering::Greater
    },
)]
fn compare_orders_numerically(a: &str, b: &str, expected: Ordering) {
    assert_eq!(compare(a, b), expected);
    assert_eq!(compare(b, a), expected.reverse());
}

#[test]
fn compare_agrees_with_integer_comparison() {
    // Cross-check against native integer ordering for a spread of values
    // of different digit lengths.
    let values: [u128; 12] = [
        0,
        1,
        9,
        10,
        99,
        100,
        101,
        999,
        1000,
        123_456_789,
        u128::from(u64::MAX),
        u128::MAX,
    ];
    for &a in &values {
        for &b in &values {
            assert_eq!(
                compare(&a.to_string(), &b.to_string()),
                a.cmp(&b),
                "compare({a}, {b})"
            );
        }
    }
}

#[test]
fn is_newer_is_strict() {
    assert!(is_newer("101", "100"));
    assert!(!is_newer("100", "100"));
    assert!(!is_newer("99", "100"));
}

#[test]
fn max_version_picks_highest() {
    let items = vec![
        Item::named("ns", "a").with_version("99"),
        Item::named("ns", "b").with_version("100"),
        Item::named("ns", "c").with_version("5"),
    ];
    assert_eq!(max_version(&items), Some("100"));
}

#[test]
fn max_version_skips_versionless_items() {
    let items = vec![
        Item::named("ns", "a"),
        Item::named("ns", "b").with_version("7"),
        Item::named("ns", "c").with_version(""),
    ];
    assert_eq!(max_version(&items), Some("7"));
}

#[test]
fn max_version_empty_or_versionless_is_none() {
    let empty: Vec<Item> = Vec::new();
    assert_eq!(max_version(&empty), None);

    let versionless = vec![Item::named("ns", "a"), Item::named("ns", "b")];
    assert_eq!(max_version(&versionless), None);
}
