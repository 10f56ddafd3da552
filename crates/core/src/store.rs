// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The client-side ordered, keyed mirror of the remote collection.
//!
//! State lives behind an `Arc` and transitions through the pure [`reduce`]
//! function. When an action changes nothing, `reduce` returns the input
//! `Arc` untouched, so downstream change detection (`Arc::ptr_eq`) is never
//! fooled into thinking something changed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::item::Item;

/// Ordered, keyed mirror of the remote collection.
///
/// Invariants: `order` contains no duplicate keys, and its key set exactly
/// equals the key set of `by_key`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    order: Vec<String>,
    by_key: HashMap<String, Item>,
}

/// State transitions applied to a [`Store`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Discard prior state and rebuild from the given items.
    ///
    /// Keys are deduplicated; the first occurrence wins.
    Reset(Vec<Item>),

    /// Append items whose keys are not already present, preserving their
    /// relative order. An item reappearing in a later page overwrites its
    /// stored value but keeps the position fixed at first insertion.
    AppendPage(Vec<Item>),

    /// Insert a live item at the front if its key is new, or replace the
    /// stored value in place (position unchanged) if it is known.
    Upsert(Item),

    /// Remove a key. Absent keys leave the store untouched.
    Remove(String),
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Store::default()
    }

    /// Builds a store as if by [`Action::Reset`].
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut store = Store::default();
        for item in items {
            let key = item.key();
            if store.by_key.contains_key(&key) {
                continue;
            }
            store.order.push(key.clone());
            store.by_key.insert(key, item);
        }
        store
    }

    /// Number of items in the store.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up an item by key.
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.by_key.get(key)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Items in store order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|k| self.by_key.get(k))
    }
}

/// Applies an action to the store.
///
/// Pure transition: the same input state and action always produce the same
/// output, with no clock or randomness involved. No-op actions (removing an
/// absent key, appending an empty page, upserting an identical item) return
/// the input `Arc` pointer-equal.
pub fn reduce(state: Arc<Store>, action: Action) -> Arc<Store> {
    match action {
        Action::Reset(items) => Arc::new(Store::from_items(items)),

        Action::AppendPage(items) => {
            if items.is_empty() {
                return state;
            }
            let mut state = state;
            let store = Arc::make_mut(&mut state);
            for item in items {
                let key = item.key();
                if !store.by_key.contains_key(&key) {
                    store.order.push(key.clone());
                }
                store.by_key.insert(key, item);
            }
            state
        }

        Action::Upsert(item) => {
            let key = item.key();
            if store_holds_identical(&state, &key, &item) {
                return state;
            }
            let mut state = state;
            let store = Arc::make_mut(&mut state);
            if !store.by_key.contains_key(&key) {
                // Live inserts go most-recent-first.
                store.order.insert(0, key.clone());
            }
            store.by_key.insert(key, item);
            state
        }

        Action::Remove(key) => {
            if !state.by_key.contains_key(&key) {
                return state;
            }
            let mut state = state;
            let store = Arc::make_mut(&mut state);
            store.by_key.remove(&key);
            store.order.retain(|k| k != &key);
            state
        }
    }
}

fn store_holds_identical(store: &Store, key: &str, item: &Item) -> bool {
    store.by_key.get(key) == Some(item)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
