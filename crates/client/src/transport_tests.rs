// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module, plus the shared mock transport.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::future;
use std::sync::{Arc, Mutex};

use reflector_core::protocol::{InboundFrame, OutboundFrame};

use crate::transport::{Transport, TransportError, TransportResult};

#[derive(Default)]
struct MockState {
    connected: bool,
    /// Frames that will be returned by recv().
    incoming: VecDeque<InboundFrame>,
    /// Frames that were sent via send().
    outgoing: Vec<OutboundFrame>,
    /// Every URL passed to connect(), in order.
    connect_urls: Vec<String>,
    fail_next_connect: bool,
    /// When true, recv() on an empty queue waits forever instead of
    /// reporting a closed connection.
    hang_when_empty: bool,
    fail_next_recv: Option<String>,
}

/// Mock transport for testing without real sockets.
///
/// All state sits behind an `Arc`, so a clone kept by the test can script
/// and observe a transport that has been moved into a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame that will be returned by recv().
    pub fn queue_incoming(&self, frame: InboundFrame) {
        self.state.lock().unwrap().incoming.push_back(frame);
    }

    /// Get all frames that were sent.
    pub fn outgoing(&self) -> Vec<OutboundFrame> {
        self.state.lock().unwrap().outgoing.clone()
    }

    /// Every URL connect() was called with, in order.
    pub fn connect_urls(&self) -> Vec<String> {
        self.state.lock().unwrap().connect_urls.clone()
    }

    /// Number of connection attempts made.
    pub fn connect_count(&self) -> usize {
        self.state.lock().unwrap().connect_urls.len()
    }

    /// Make the next connect attempt fail.
    pub fn fail_next_connect(&self) {
        self.state.lock().unwrap().fail_next_connect = true;
    }

    /// Make recv() on an empty queue hang instead of reporting a close.
    pub fn set_hang_when_empty(&self, hang: bool) {
        self.state.lock().unwrap().hang_when_empty = hang;
    }

    /// Make the next recv() fail with a transport error.
    pub fn fail_next_recv(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_next_recv = Some(message.into());
    }
}

impl Transport for MockTransport {
    fn connect(
        &mut self,
        url: &str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = TransportResult<()>> + Send + '_>>
    {
        let state = Arc::clone(&self.state);
        let url = url.to_string();
        Box::pin(async move {
            let mut s = state.lock().unwrap();
            s.connect_urls.push(url);
            if s.fail_next_connect {
                s.fail_next_connect = false;
                return Err(TransportError::ConnectionFailed("mock failure".into()));
            }
            s.connected = true;
            Ok(())
        })
    }

    fn disconnect(
        &mut self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = TransportResult<()>> + Send + '_>>
    {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            state.lock().unwrap().connected = false;
            Ok(())
        })
    }

    fn send(
        &mut self,
        frame: OutboundFrame,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = TransportResult<()>> + Send + '_>>
    {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let mut s = state.lock().unwrap();
            if !s.connected {
                return Err(TransportError::ConnectionClosed);
            }
            s.outgoing.push(frame);
            Ok(())
        })
    }

    fn recv(
        &mut self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = TransportResult<Option<InboundFrame>>> + Send + '_>,
    > {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let (frame, hang, fail) = {
                let mut s = state.lock().unwrap();
                (
                    s.incoming.pop_front(),
                    s.hang_when_empty,
                    s.fail_next_recv.take(),
                )
            };
            if let Some(message) = fail {
                state.lock().unwrap().connected = false;
                return Err(TransportError::ReceiveFailed(message));
            }
            match frame {
                Some(frame) => Ok(Some(frame)),
                None if hang => future::pending().await,
                None => {
                    // Empty queue models the server closing the connection.
                    state.lock().unwrap().connected = false;
                    Ok(None)
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let mut transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://api.test").await.unwrap();
    assert!(transport.is_connected());
    assert_eq!(transport.connect_urls(), vec!["ws://api.test"]);

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_send_recv() {
    let mut transport = MockTransport::new();
    transport.connect("ws://api.test").await.unwrap();

    transport
        .send(OutboundFrame::scroll("c1", 50))
        .await
        .unwrap();
    let outgoing = transport.outgoing();
    assert_eq!(outgoing.len(), 1);
    assert!(matches!(outgoing[0], OutboundFrame::Scroll { .. }));

    transport.queue_incoming(InboundFrame::page(Vec::new(), None));
    let received = transport.recv().await.unwrap();
    assert!(matches!(received, Some(InboundFrame::Page { .. })));

    // Empty queue reads as a closed connection
    let received = transport.recv().await.unwrap();
    assert!(received.is_none());
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_connect_fail() {
    let mut transport = MockTransport::new();
    transport.fail_next_connect();

    let result = transport.connect("ws://api.test").await;
    assert!(result.is_err());
    assert!(!transport.is_connected());
    assert_eq!(transport.connect_count(), 1);

    // The failure only applies once
    transport.connect("ws://api.test").await.unwrap();
    assert!(transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_send_requires_connection() {
    let mut transport = MockTransport::new();
    let result = transport.send(OutboundFrame::scroll("c1", 50)).await;
    assert!(matches!(result, Err(TransportError::ConnectionClosed)));
}

#[tokio::test]
async fn test_mock_transport_recv_failure() {
    let mut transport = MockTransport::new();
    transport.connect("ws://api.test").await.unwrap();
    transport.fail_next_recv("boom");

    let result = transport.recv().await;
    assert!(matches!(result, Err(TransportError::ReceiveFailed(_))));
}
