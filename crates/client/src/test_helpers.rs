// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for engine tests.

use std::time::Duration;

use reflector_core::item::Item;
use reflector_core::query::ResourceQuery;

use crate::backoff::{Backoff, JitterSource};
use crate::client::{WatchClient, WatchConfig};
use crate::transport_tests::MockTransport;

/// Jitter source that always returns zero, for deterministic delays.
pub struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

/// Create a test item keyed `ns/<name>`.
pub fn item(name: &str) -> Item {
    Item::named("ns", name)
}

/// Create a test item with a resource version.
pub fn versioned(name: &str, rv: &str) -> Item {
    Item::named("ns", name).with_version(rv)
}

/// Create an engine over a mock transport with short, jitter-free timing.
pub fn test_client(transport: MockTransport) -> WatchClient<MockTransport> {
    let config = WatchConfig {
        base_url: "http://api.test".to_string(),
        initial_delay_ms: 1,
        max_delay_secs: 1,
        page_timeout: Duration::from_millis(200),
        auto_drain: false,
    };
    let backoff = Backoff::with_jitter(
        Duration::from_millis(1),
        Duration::from_secs(1),
        Box::new(ZeroJitter),
    );
    WatchClient::with_transport(config, ResourceQuery::new("v1", "pods"), transport)
        .with_backoff(backoff)
}
