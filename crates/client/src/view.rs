// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciled view and the inbound frame handler.
//!
//! [`WatchView`] holds everything a consumer can read from the engine: the
//! store, the version anchor, the continuation token, and the status/error
//! side channels. [`WatchView::apply`] is the frame protocol handler; it
//! matches every frame kind exhaustively, so a new frame variant cannot be
//! silently ignored by mistake.

use std::sync::Arc;

use reflector_core::protocol::InboundFrame;
use reflector_core::store::{reduce, Action, Store};
use reflector_core::version;
use tracing::debug;

/// Runtime-toggleable flags gating live event application.
///
/// Both flags are read at frame-handling time: a caller can freeze the
/// visible view (for example while a user interacts with a table) while the
/// version anchor keeps tracking underneath for a clean resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveFlags {
    /// Freeze the store against live ADDED/MODIFIED/DELETED events.
    pub paused: bool,
    /// Apply adds and modifications but keep deleted items visible.
    pub ignore_removals: bool,
}

/// What applying one inbound frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// An `INITIAL` snapshot replaced the store.
    Snapshot,
    /// A `PAGE` was appended; carries the count of genuinely new items.
    Page { new_items: usize },
    /// A data-level error was surfaced.
    Failed,
    /// A live event mutated the store.
    Applied,
    /// A live event was received but gated off by [`LiveFlags`].
    Suppressed,
    /// The frame required no store work (server log, unknown kind).
    Ignored,
}

/// The reconciled, read-only view of the remote collection.
#[derive(Debug, Clone, Default)]
pub struct WatchView {
    store: Arc<Store>,
    /// Highest version token observed since the last reset.
    resource_version: Option<String>,
    continue_token: Option<String>,
    has_more: bool,
    last_error: Option<String>,
    snapshot_seen: bool,
    page_in_flight: bool,
}

impl WatchView {
    /// The current store. Cheap to clone; shares the underlying state.
    pub fn store(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    /// The version anchor: highest version token observed so far.
    pub fn resource_version(&self) -> Option<&str> {
        self.resource_version.as_deref()
    }

    /// The current continuation token, if more pages exist.
    pub fn continue_token(&self) -> Option<&str> {
        self.continue_token.as_deref()
    }

    /// True when the server holds more pages of the current snapshot.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// The most recent surfaced error, cleared by the next snapshot or
    /// successful page.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True once an `INITIAL` snapshot has been applied.
    pub fn snapshot_seen(&self) -> bool {
        self.snapshot_seen
    }

    /// True while a page request is awaiting its response.
    pub fn page_in_flight(&self) -> bool {
        self.page_in_flight
    }

    pub(crate) fn set_page_in_flight(&mut self, in_flight: bool) {
        self.page_in_flight = in_flight;
    }

    pub(crate) fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Discards the mirror entirely: store, continuation token, version
    /// anchor, and error. Used when the logical resource identity changes
    /// without state preservation.
    pub(crate) fn clear(&mut self) {
        *self = WatchView::default();
    }

    /// Raises the version anchor if the candidate is strictly higher.
    fn advance_anchor(&mut self, candidate: Option<&str>) {
        let Some(candidate) = candidate else { return };
        match self.resource_version.as_deref() {
            Some(current) if !version::is_newer(candidate, current) => {}
            _ => self.resource_version = Some(candidate.to_string()),
        }
    }

    /// Applies one inbound frame to the view.
    pub(crate) fn apply(&mut self, frame: InboundFrame, flags: LiveFlags) -> FrameOutcome {
        match frame {
            InboundFrame::Initial {
                items,
                continue_token,
                resource_version,
            } => {
                let anchor = resource_version
                    .or_else(|| version::max_version(&items).map(str::to_string));
                self.store = reduce(std::mem::take(&mut self.store), Action::Reset(items));
                self.has_more = continue_token.is_some();
                self.continue_token = continue_token;
                self.resource_version = anchor;
                self.last_error = None;
                self.snapshot_seen = true;
                self.page_in_flight = false;
                FrameOutcome::Snapshot
            }

            InboundFrame::Page {
                items,
                continue_token,
            } => {
                let batch_max = version::max_version(&items).map(str::to_string);
                let before = self.store.len();
                self.store = reduce(std::mem::take(&mut self.store), Action::AppendPage(items));
                let new_items = self.store.len() - before;
                self.has_more = continue_token.is_some();
                self.continue_token = continue_token;
                self.advance_anchor(batch_max.as_deref());
                self.last_error = None;
                self.page_in_flight = false;
                FrameOutcome::Page { new_items }
            }

            InboundFrame::PageError { error } => {
                self.last_error = Some(error);
                // Clearing the in-flight flag lets a retry be issued.
                self.page_in_flight = false;
                FrameOutcome::Failed
            }

            InboundFrame::InitialError { message } => {
                self.last_error = Some(message);
                FrameOutcome::Failed
            }

            InboundFrame::Added { item } | InboundFrame::Modified { item } => {
                self.advance_anchor(item.resource_version());
                if flags.paused {
                    return FrameOutcome::Suppressed;
                }
                self.store = reduce(std::mem::take(&mut self.store), Action::Upsert(item));
                FrameOutcome::Applied
            }

            InboundFrame::Deleted { item } => {
                self.advance_anchor(item.resource_version());
                if flags.paused || flags.ignore_removals {
                    return FrameOutcome::Suppressed;
                }
                let key = item.key();
                self.store = reduce(std::mem::take(&mut self.store), Action::Remove(key));
                FrameOutcome::Applied
            }

            InboundFrame::ServerLog { message } => {
                if let Some(message) = message {
                    debug!(%message, "server log");
                }
                FrameOutcome::Ignored
            }

            InboundFrame::Unknown => FrameOutcome::Ignored,
        }
    }
}
