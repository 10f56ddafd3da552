// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle for the watch engine.
//!
//! Owns the transport and the status machine
//! (`closed → connecting → open → closed → …`), schedules backoff
//! reconnection on unintentional closes, suppresses exactly one reconnect
//! cycle after an intentional close, and drives the inbound frame handler.
//!
//! The engine is pull-driven: every store mutation happens inside
//! [`WatchClient::step`] on the caller's task, so no locking is needed and
//! frame bursts apply in arrival order.

use std::sync::Arc;
use std::time::Duration;

use reflector_core::protocol::OutboundFrame;
use reflector_core::query::ResourceQuery;
use reflector_core::store::Store;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::drain::DrainLimits;
use crate::transport::{Transport, TransportError, WebSocketTransport};
use crate::view::{FrameOutcome, LiveFlags, WatchView};

/// Configuration for the watch engine.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Base URL of the server; `http(s)` is upgraded to `ws(s)`.
    pub base_url: String,
    /// Initial delay for exponential backoff (milliseconds).
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (seconds).
    pub max_delay_secs: u64,
    /// How long to wait for a requested page before giving up.
    pub page_timeout: Duration,
    /// Drain all remaining pages as soon as a snapshot arrives (applies to
    /// [`WatchClient::run`]).
    pub auto_drain: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            base_url: "http://localhost:8001".to_string(),
            initial_delay_ms: 100,
            max_delay_secs: 30,
            page_timeout: Duration::from_secs(10),
            auto_drain: false,
        }
    }
}

/// Error type for watch engine operations.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Data-model or URL error.
    #[error(transparent)]
    Core(#[from] reflector_core::Error),

    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// The engine is disabled.
    #[error("engine is disabled")]
    Disabled,

    /// A requested page never arrived.
    #[error("page request timed out")]
    PageTimeout,
}

/// Result type for watch engine operations.
pub type WatchResult<T> = Result<T, WatchError>;

/// Whether frames can be sent and received right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// A connection attempt is in progress.
    Connecting,
    /// The transport is open.
    Open,
    /// No transport.
    Closed,
}

/// One unit of engine work performed by [`WatchClient::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Engine disabled or nothing to do.
    Idle,
    /// A scheduled reconnect attempt succeeded.
    Connected,
    /// A scheduled reconnect attempt failed; backoff advanced.
    RetryFailed,
    /// An inbound frame was received and applied.
    Frame(FrameOutcome),
    /// The connection closed.
    Closed,
}

/// The list-then-watch synchronization engine.
pub struct WatchClient<T: Transport = WebSocketTransport> {
    config: WatchConfig,
    query: ResourceQuery,
    transport: T,
    status: ConnectionStatus,
    enabled: bool,
    /// Set before a caller-initiated close; suppresses one automatic
    /// reconnect cycle.
    intentional_close: bool,
    /// Set while a caller-initiated reconnect is in flight; transport
    /// errors raised during it are dropped instead of surfaced.
    suppress_errors: bool,
    reconnect_pending: bool,
    backoff: Backoff,
    pub(crate) view: WatchView,
    flags: LiveFlags,
}

impl WatchClient<WebSocketTransport> {
    /// Creates an engine with the default WebSocket transport.
    pub fn new(config: WatchConfig, query: ResourceQuery) -> Self {
        Self::with_transport(config, query, WebSocketTransport::new())
    }
}

impl<T: Transport> WatchClient<T> {
    /// Creates an engine with a custom transport (for testing).
    pub fn with_transport(config: WatchConfig, query: ResourceQuery, transport: T) -> Self {
        let backoff = Backoff::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_secs(config.max_delay_secs),
        );
        WatchClient {
            config,
            query,
            transport,
            status: ConnectionStatus::Closed,
            enabled: true,
            intentional_close: false,
            suppress_errors: false,
            reconnect_pending: false,
            backoff,
            view: WatchView::default(),
            flags: LiveFlags::default(),
        }
    }

    /// Replaces the backoff (for deterministic jitter in tests).
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// True unless the engine has been externally gated off.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while an automatic reconnect is scheduled.
    ///
    /// While this holds, callers should drive [`WatchClient::step`] and let
    /// the backoff timer govern the retry instead of dialing themselves.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    /// The reconciled view: store, anchor, token, error signals.
    pub fn view(&self) -> &WatchView {
        &self.view
    }

    /// The current store snapshot.
    pub fn store(&self) -> Arc<Store> {
        self.view.store()
    }

    /// The logical resource query this engine mirrors.
    pub fn query(&self) -> &ResourceQuery {
        &self.query
    }

    /// The engine configuration.
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Current live-event flags.
    pub fn flags(&self) -> LiveFlags {
        self.flags
    }

    /// Freezes or unfreezes the store against live events. Frames received
    /// while paused are not retroactively applied on resume.
    pub fn set_paused(&mut self, paused: bool) {
        self.flags.paused = paused;
    }

    /// Toggles whether `DELETED` events are applied to the store.
    pub fn set_ignore_removals(&mut self, ignore: bool) {
        self.flags.ignore_removals = ignore;
    }

    /// Gates the engine on or off.
    ///
    /// Disabling cancels any pending reconnect, closes the transport
    /// without scheduling another attempt, and pins status to closed. The
    /// view stays readable: callers may still see last-known data.
    pub async fn set_enabled(&mut self, enabled: bool) -> WatchResult<()> {
        if self.enabled == enabled {
            return Ok(());
        }
        self.enabled = enabled;
        if enabled {
            self.connect().await
        } else {
            self.reconnect_pending = false;
            self.close_transport().await;
            Ok(())
        }
    }

    /// Opens the transport for the current query.
    ///
    /// Embeds the version anchor (when held) so the server can replay only
    /// missed events instead of resending a full snapshot. No-op when
    /// already connecting or open.
    pub async fn connect(&mut self) -> WatchResult<()> {
        if !self.enabled {
            return Err(WatchError::Disabled);
        }
        if matches!(
            self.status,
            ConnectionStatus::Connecting | ConnectionStatus::Open
        ) {
            return Ok(());
        }

        let url = self.query.watch_url(
            &self.config.base_url,
            self.view.resource_version(),
            self.view.continue_token(),
        )?;
        self.status = ConnectionStatus::Connecting;
        debug!(url = %url, "connecting");

        match self.transport.connect(url.as_str()).await {
            Ok(()) => {
                self.status = ConnectionStatus::Open;
                self.backoff.reset();
                self.view.set_page_in_flight(false);
                self.suppress_errors = false;
                self.intentional_close = false;
                self.reconnect_pending = false;
                info!(plural = %self.query.plural, "watch connection open");
                Ok(())
            }
            Err(e) => {
                self.status = ConnectionStatus::Closed;
                if !self.suppress_errors {
                    self.view.set_error(e.to_string());
                }
                if self.enabled {
                    self.reconnect_pending = true;
                }
                warn!(error = %e, "watch connection failed");
                Err(e.into())
            }
        }
    }

    /// Forces a fresh connection immediately, bypassing backoff.
    ///
    /// Produces exactly one connection attempt: the intentional close is
    /// not fed back into the automatic reconnect path, and transport errors
    /// raised by the close are dropped.
    pub async fn reconnect(&mut self) -> WatchResult<()> {
        self.suppress_errors = true;
        self.reconnect_pending = false;
        self.close_transport().await;
        self.connect().await
    }

    /// Points the engine at a different logical resource.
    ///
    /// Always reconnects. With `preserve` false the store, continuation
    /// token, and version anchor are cleared immediately so stale data is
    /// never shown; with `preserve` true the old view stays visible until
    /// the next snapshot replaces it.
    pub async fn set_query(&mut self, query: ResourceQuery, preserve: bool) -> WatchResult<()> {
        self.query = query;
        if !preserve {
            self.view.clear();
        }
        self.reconnect().await
    }

    /// Moves the engine to a different server endpoint; same preservation
    /// semantics as [`WatchClient::set_query`].
    pub async fn set_base_url(
        &mut self,
        base_url: impl Into<String>,
        preserve: bool,
    ) -> WatchResult<()> {
        self.config.base_url = base_url.into();
        if !preserve {
            self.view.clear();
        }
        self.reconnect().await
    }

    /// Performs one unit of engine work.
    ///
    /// With the connection open, receives and applies one frame. With the
    /// connection closed and a reconnect pending, waits out one backoff
    /// delay and attempts to connect. Callers run the engine by looping
    /// over `step` (see [`WatchClient::run`]).
    pub async fn step(&mut self) -> WatchResult<Step> {
        if !self.enabled {
            return Ok(Step::Idle);
        }
        match self.status {
            ConnectionStatus::Open => self.recv_apply().await,
            ConnectionStatus::Closed | ConnectionStatus::Connecting => {
                if !self.reconnect_pending {
                    return Ok(Step::Idle);
                }
                let delay = self.backoff.next_delay();
                debug!(?delay, "backing off before reconnect");
                tokio::time::sleep(delay).await;
                match self.connect().await {
                    Ok(()) => Ok(Step::Connected),
                    Err(_) => Ok(Step::RetryFailed),
                }
            }
        }
    }

    /// Runs the engine until it is disabled.
    ///
    /// Connects if necessary, then loops over [`WatchClient::step`]. When
    /// `auto_drain` is configured, every snapshot is followed by a full
    /// drain of the remaining pages.
    pub async fn run(&mut self) -> WatchResult<()> {
        while self.enabled {
            if self.status == ConnectionStatus::Closed && !self.reconnect_pending {
                // First connect; failures fall through to backoff in step().
                let _ = self.connect().await;
            }
            match self.step().await {
                Ok(Step::Frame(FrameOutcome::Snapshot))
                    if self.config.auto_drain && self.view.has_more() =>
                {
                    match self.drain_all(DrainLimits::default()).await {
                        Ok(added) => debug!(added, "auto-drain complete"),
                        Err(WatchError::PageTimeout) => warn!("auto-drain page timed out"),
                        Err(e) => return Err(e),
                    }
                }
                Ok(_) => {}
                Err(WatchError::PageTimeout) => warn!("page request timed out"),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Receives one frame and applies it to the view.
    async fn recv_apply(&mut self) -> WatchResult<Step> {
        match self.transport.recv().await {
            Ok(Some(frame)) => {
                let outcome = self.view.apply(frame, self.flags);
                Ok(Step::Frame(outcome))
            }
            Ok(None) => {
                self.on_closed();
                Ok(Step::Closed)
            }
            Err(e) => {
                if self.suppress_errors || self.intentional_close {
                    debug!(error = %e, "transport error suppressed");
                } else {
                    self.view.set_error(e.to_string());
                }
                self.on_closed();
                Ok(Step::Closed)
            }
        }
    }

    /// Sends a frame over the open transport.
    pub(crate) async fn send(&mut self, frame: OutboundFrame) -> WatchResult<()> {
        if self.status != ConnectionStatus::Open {
            return Err(WatchError::NotConnected);
        }
        match self.transport.send(frame).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if !self.suppress_errors {
                    self.view.set_error(e.to_string());
                }
                self.on_closed();
                Err(e.into())
            }
        }
    }

    /// Handles a transport close. Only the close path, never the error
    /// path, schedules reconnection, so a close that also raises an error
    /// cannot double-schedule.
    fn on_closed(&mut self) {
        self.status = ConnectionStatus::Closed;
        self.view.set_page_in_flight(false);
        if self.intentional_close {
            // Suppress the automatic path exactly once.
            self.intentional_close = false;
        } else if self.enabled {
            self.reconnect_pending = true;
            info!("watch connection closed, reconnect scheduled");
        }
    }

    /// Closes the transport without triggering the automatic reconnect
    /// path.
    async fn close_transport(&mut self) {
        self.intentional_close = true;
        if let Err(e) = self.transport.disconnect().await {
            debug!(error = %e, "error closing transport");
        }
        self.status = ConnectionStatus::Closed;
        self.view.set_page_in_flight(false);
    }
}
