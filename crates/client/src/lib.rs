// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reflector-client: list-then-watch synchronization engine.
//!
//! Mirrors a remote, paginated, versioned collection over a persistent
//! WebSocket connection and keeps a local store consistent without
//! re-fetching the whole collection on every change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  WatchClient │────►│  Transport  │────►│   Server    │
//! │   (engine)   │◄────│   (trait)   │◄────│             │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  WatchView   │  (store, version anchor, continuation token)
//! └──────────────┘
//! ```
//!
//! # Features
//!
//! - Consistent snapshot plus live ADDED/MODIFIED/DELETED events
//! - On-demand or automatic draining of remaining snapshot pages
//! - Automatic reconnect with exponential backoff and a resume anchor
//! - Injectable transport and jitter source for testing
//! - Strategy selector unifying watch and list-only access paths

pub mod backoff;
pub mod client;
pub mod drain;
pub mod strategy;
pub mod transport;
pub mod view;

pub use backoff::{Backoff, JitterSource, ThreadRngJitter};
pub use client::{ConnectionStatus, Step, WatchClient, WatchConfig, WatchError, WatchResult};
pub use drain::DrainLimits;
pub use strategy::{
    select_mode, Capabilities, FetchError, ListFetcher, ResourceMode, ResourceResult,
    ResourceSelector,
};
pub use transport::{Transport, TransportError, TransportResult, WebSocketTransport};
pub use view::{FrameOutcome, LiveFlags, WatchView};

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod transport_tests;




#[cfg(test)]
mod drain_tests;
