// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pagination: scroll requests and snapshot draining.
//!
//! Paging is strictly sequential: one scroll request is issued and its
//! `PAGE` response awaited before the next goes out. Ordering stays
//! well-defined and the server never races multiple cursors from the same
//! client.

use tokio::time::timeout;
use tracing::debug;

use reflector_core::protocol::OutboundFrame;

use crate::client::{ConnectionStatus, Step, WatchClient, WatchError, WatchResult};
use crate::transport::Transport;
use crate::view::FrameOutcome;

/// Ceilings for [`WatchClient::drain_all`].
#[derive(Debug, Clone, Copy)]
pub struct DrainLimits {
    /// Maximum number of pages to request.
    pub max_pages: usize,
    /// Stop once at least this many new items have been added.
    pub max_items: usize,
}

impl Default for DrainLimits {
    fn default() -> Self {
        DrainLimits {
            max_pages: 25,
            max_items: 5000,
        }
    }
}

impl<T: Transport> WatchClient<T> {
    /// Requests the next page of the current snapshot.
    ///
    /// Sends a scroll request carrying the continuation token and the page
    /// size hint, but only if the transport is open, a token is held, and
    /// no page request is already in flight. Otherwise it is a no-op that
    /// returns `false`; it never queues and never errors.
    pub async fn request_next_page(&mut self) -> WatchResult<bool> {
        if self.status() != ConnectionStatus::Open || self.view.page_in_flight() {
            return Ok(false);
        }
        let Some(token) = self.view.continue_token().map(str::to_string) else {
            return Ok(false);
        };
        let limit = self.query().limit;
        self.send(OutboundFrame::scroll(token, limit)).await?;
        self.view.set_page_in_flight(true);
        Ok(true)
    }

    /// Drains the remaining pages of the snapshot.
    ///
    /// Repeatedly requests the next page and awaits exactly one resulting
    /// `PAGE` frame before issuing the next. Stops when a ceiling is
    /// reached, the continuation token is exhausted, a page fails, or the
    /// transport is no longer open. Returns the count of genuinely new
    /// items added (a termination and telemetry signal, not a correctness
    /// one).
    pub async fn drain_all(&mut self, limits: DrainLimits) -> WatchResult<usize> {
        let mut added = 0;
        let mut pages = 0;
        while pages < limits.max_pages && added < limits.max_items {
            if !self.request_next_page().await? {
                break;
            }
            pages += 1;
            match self.await_page().await? {
                Some(new_items) => added += new_items,
                None => break,
            }
        }
        debug!(pages, added, "drain finished");
        Ok(added)
    }

    /// Awaits the response to the in-flight page request, applying every
    /// frame received along the way.
    ///
    /// Resolves with the page's new-item count, or `None` when the drain
    /// should stop (page error or connection closed). A page that never
    /// arrives within the configured timeout clears the in-flight flag,
    /// leaving a later retry possible, and fails with
    /// [`WatchError::PageTimeout`].
    async fn await_page(&mut self) -> WatchResult<Option<usize>> {
        loop {
            let step = match timeout(self.config().page_timeout, self.step()).await {
                Ok(step) => step?,
                Err(_) => {
                    self.view.set_page_in_flight(false);
                    return Err(WatchError::PageTimeout);
                }
            };
            match step {
                Step::Frame(FrameOutcome::Page { new_items }) => return Ok(Some(new_items)),
                Step::Frame(FrameOutcome::Failed) => return Ok(None),
                // A fresh snapshot invalidates the outstanding cursor; the
                // drain restarts from the new continuation token.
                Step::Frame(FrameOutcome::Snapshot) => return Ok(None),
                Step::Closed | Step::Idle => return Ok(None),
                // Live events keep applying while we wait.
                Step::Frame(_) | Step::Connected | Step::RetryFailed => continue,
            }
        }
    }
}
