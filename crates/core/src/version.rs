// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Version token ordering.
//!
//! Resource versions are decimal digit strings of arbitrary length that may
//! exceed native integer precision. Ordering by length first and then
//! lexicographically matches true numeric ordering for such strings without
//! ever parsing them, so very large counters lose no precision.

use std::cmp::Ordering;

use crate::item::Item;

/// Compares two version tokens numerically.
pub fn compare(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Returns true if `a` is a strictly higher version than `b`.
pub fn is_newer(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Greater
}

/// Returns the highest version token across a batch of items.
///
/// Items without an extractable version are skipped; returns `None` for an
/// empty or versionless batch.
pub fn max_version<'a, I>(items: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .filter_map(Item::resource_version)
        .max_by(|a, b| compare(a, b))
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
