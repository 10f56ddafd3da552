// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use reflector_core::protocol::{InboundFrame, OutboundFrame};

use crate::client::WatchError;
use crate::drain::DrainLimits;
use crate::test_helpers::{item, test_client};
use crate::transport_tests::MockTransport;

#[tokio::test]
async fn test_request_next_page_requires_open_connection() {
    let transport = MockTransport::new();
    let mut client = test_client(transport);

    assert!(!client.request_next_page().await.unwrap());
}

#[tokio::test]
async fn test_request_next_page_requires_token() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(vec![item("a")], None, None));

    let mut client = test_client(transport.clone());
    client.connect().await.unwrap();
    client.step().await.unwrap();

    // Snapshot carried no continuation token
    assert!(!client.request_next_page().await.unwrap());
    assert!(transport.outgoing().is_empty());
}

#[tokio::test]
async fn test_request_next_page_sends_scroll_once() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));

    let mut client = test_client(transport.clone());
    client.connect().await.unwrap();
    client.step().await.unwrap();

    assert!(client.request_next_page().await.unwrap());
    assert!(client.view().page_in_flight());

    // A second request while one is outstanding is a no-op
    assert!(!client.request_next_page().await.unwrap());

    let outgoing = transport.outgoing();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(
        outgoing[0],
        OutboundFrame::scroll("c1", client.query().limit)
    );
}

#[tokio::test]
async fn test_drain_all_walks_every_page() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    transport.queue_incoming(InboundFrame::page(
        vec![item("b"), item("c")],
        Some("c2".to_string()),
    ));
    transport.queue_incoming(InboundFrame::page(vec![item("d")], None));

    let mut client = test_client(transport.clone());
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let added = client.drain_all(DrainLimits::default()).await.unwrap();

    assert_eq!(added, 3);
    assert_eq!(client.store().len(), 4);
    assert!(!client.view().has_more());
    assert!(!client.view().page_in_flight());

    // Strictly sequential: each scroll carries the token from the
    // previous response.
    let outgoing = transport.outgoing();
    assert_eq!(outgoing.len(), 2);
    assert_eq!(outgoing[0], OutboundFrame::scroll("c1", 50));
    assert_eq!(outgoing[1], OutboundFrame::scroll("c2", 50));
}

#[tokio::test]
async fn test_drain_applies_live_events_while_waiting() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    transport.queue_incoming(InboundFrame::added(item("live")));
    transport.queue_incoming(InboundFrame::page(vec![item("b")], None));

    let mut client = test_client(transport);
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let added = client.drain_all(DrainLimits::default()).await.unwrap();

    // Only page items count toward the drain total
    assert_eq!(added, 1);
    assert!(client.store().contains("ns/live"));
    assert!(client.store().contains("ns/b"));
}

#[tokio::test]
async fn test_drain_stops_at_max_pages() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    transport.queue_incoming(InboundFrame::page(
        vec![item("b")],
        Some("c2".to_string()),
    ));
    transport.queue_incoming(InboundFrame::page(
        vec![item("c")],
        Some("c3".to_string()),
    ));

    let mut client = test_client(transport.clone());
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let limits = DrainLimits {
        max_pages: 2,
        ..DrainLimits::default()
    };
    let added = client.drain_all(limits).await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(transport.outgoing().len(), 2);
    // The server still holds more; the token survives for a later drain
    assert!(client.view().has_more());
}

#[tokio::test]
async fn test_drain_stops_at_max_items() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    transport.queue_incoming(InboundFrame::page(
        vec![item("b"), item("c"), item("d")],
        Some("c2".to_string()),
    ));

    let mut client = test_client(transport.clone());
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let limits = DrainLimits {
        max_items: 2,
        ..DrainLimits::default()
    };
    let added = client.drain_all(limits).await.unwrap();

    // The page that crossed the ceiling still applied in full
    assert_eq!(added, 3);
    assert_eq!(transport.outgoing().len(), 1);
}

#[tokio::test]
async fn test_drain_stops_on_page_error() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    transport.queue_incoming(InboundFrame::page_error("cursor expired"));

    let mut client = test_client(transport);
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let added = client.drain_all(DrainLimits::default()).await.unwrap();

    assert_eq!(added, 0);
    assert_eq!(client.view().last_error(), Some("cursor expired"));
    assert!(!client.view().page_in_flight());
}

#[tokio::test(start_paused = true)]
async fn test_drain_stops_when_connection_drops() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    // Nothing more queued: the next recv reads as a server close

    let mut client = test_client(transport);
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let added = client.drain_all(DrainLimits::default()).await.unwrap();

    assert_eq!(added, 0);
    assert!(!client.view().page_in_flight());
}

#[tokio::test]
async fn test_drain_restarts_cleanly_after_mid_drain_snapshot() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    // The server resends a snapshot instead of answering the scroll,
    // invalidating the outstanding cursor.
    transport.queue_incoming(InboundFrame::initial(
        vec![item("x")],
        Some("fresh".to_string()),
        None,
    ));

    let mut client = test_client(transport.clone());
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let added = client.drain_all(DrainLimits::default()).await.unwrap();

    assert_eq!(added, 0);
    assert_eq!(client.view().continue_token(), Some("fresh"));
    assert!(!client.view().page_in_flight());
    assert_eq!(transport.outgoing().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_page_timeout_clears_in_flight() {
    let transport = MockTransport::new();
    transport.queue_incoming(InboundFrame::initial(
        vec![item("a")],
        Some("c1".to_string()),
        None,
    ));
    // The scroll response never arrives
    transport.set_hang_when_empty(true);

    let mut client = test_client(transport);
    client.connect().await.unwrap();
    client.step().await.unwrap();

    let result = client.drain_all(DrainLimits::default()).await;

    assert!(matches!(result, Err(WatchError::PageTimeout)));
    // The flag is released so a later retry can issue a fresh request
    assert!(!client.view().page_in_flight());
}
