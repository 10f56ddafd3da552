// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resource strategy selection: watch engine vs. one-shot list fetch.
//!
//! The remote side may grant list access without watch access. The
//! selector probes declared capabilities (an external oracle; policy
//! evaluation is not this crate's concern) and routes the request either
//! to the full synchronization engine or to a plain fetch, unifying both
//! into one result shape so consumers never branch on transport type.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reflector_core::item::Item;
use reflector_core::query::ResourceQuery;
use reflector_core::store::Store;

use crate::client::{ConnectionStatus, WatchClient};
use crate::transport::Transport;

/// Result of the external capability probe for a resource.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    /// List access granted.
    pub can_list: bool,
    /// Watch access granted.
    pub can_watch: bool,
    /// True while the probe itself is still resolving.
    pub is_loading: bool,
    /// True when the probe failed.
    pub is_error: bool,
    /// Probe failure detail, if any.
    pub error: Option<String>,
}

/// How a resource request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMode {
    /// Caller turned the request off, or no access was granted.
    Disabled,
    /// Waiting for the capability probe.
    VerbsLoading,
    /// The capability probe failed.
    VerbsError,
    /// Full synchronization engine over the persistent connection.
    Watch,
    /// Plain one-shot fetch; no live updates.
    List,
}

/// Picks the serving mode for a request, in priority order.
pub fn select_mode(enabled: bool, caps: &Capabilities) -> ResourceMode {
    if !enabled {
        return ResourceMode::Disabled;
    }
    if caps.is_loading {
        return ResourceMode::VerbsLoading;
    }
    if caps.is_error {
        return ResourceMode::VerbsError;
    }
    if caps.can_list && caps.can_watch {
        return ResourceMode::Watch;
    }
    if caps.can_list {
        return ResourceMode::List;
    }
    ResourceMode::Disabled
}

/// Error from the one-shot list collaborator.
#[derive(Debug, thiserror::Error)]
#[error("list fetch failed: {0}")]
pub struct FetchError(pub String);

/// External REST collaborator used when only list access is granted.
pub trait ListFetcher: Send {
    /// Fetches the collection once.
    fn fetch(
        &mut self,
        query: &ResourceQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Item>, FetchError>> + Send + '_>>;
}

/// The one result shape every mode resolves to.
#[derive(Debug, Clone)]
pub struct ResourceResult {
    /// The reconciled collection, when any data exists.
    pub data: Option<Arc<Store>>,
    /// True while no data is available yet but some is expected.
    pub is_loading: bool,
    /// True when the result carries an error.
    pub is_error: bool,
    /// Human-readable error detail.
    pub error: Option<String>,
    /// Which mode actually served this result.
    pub used: ResourceMode,
}

impl ResourceResult {
    fn empty(used: ResourceMode) -> Self {
        ResourceResult {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
            used,
        }
    }
}

/// Routes a resource request to the watch engine or the list fetcher
/// based on declared capabilities.
pub struct ResourceSelector<T: Transport, F: ListFetcher> {
    enabled: bool,
    watch: WatchClient<T>,
    fetcher: F,
}

impl<T: Transport, F: ListFetcher> ResourceSelector<T, F> {
    /// Creates a selector around an engine and a list collaborator.
    pub fn new(watch: WatchClient<T>, fetcher: F) -> Self {
        ResourceSelector {
            enabled: true,
            watch,
            fetcher,
        }
    }

    /// Gates the whole request on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The underlying watch engine.
    pub fn watch(&self) -> &WatchClient<T> {
        &self.watch
    }

    /// Mutable access to the underlying watch engine (to step it, toggle
    /// flags, or change the query).
    pub fn watch_mut(&mut self) -> &mut WatchClient<T> {
        &mut self.watch
    }

    /// The mode the given capabilities select.
    pub fn mode(&self, caps: &Capabilities) -> ResourceMode {
        select_mode(self.enabled, caps)
    }

    /// Resolves the request under the given capabilities into the unified
    /// result shape.
    ///
    /// Probe errors take priority over any data-layer error: no fetch is
    /// attempted without capability confirmation.
    pub async fn resolve(&mut self, caps: &Capabilities) -> ResourceResult {
        match self.mode(caps) {
            ResourceMode::Disabled => ResourceResult::empty(ResourceMode::Disabled),

            ResourceMode::VerbsLoading => ResourceResult {
                is_loading: true,
                ..ResourceResult::empty(ResourceMode::VerbsLoading)
            },

            ResourceMode::VerbsError => ResourceResult {
                is_error: true,
                error: caps
                    .error
                    .clone()
                    .or_else(|| Some("capability probe failed".to_string())),
                ..ResourceResult::empty(ResourceMode::VerbsError)
            },

            ResourceMode::Watch => self.resolve_watch().await,

            ResourceMode::List => self.resolve_list().await,
        }
    }

    async fn resolve_watch(&mut self) -> ResourceResult {
        // A scheduled reconnect stays behind the backoff timer; dialing
        // here would redial a down server on every poll.
        if self.watch.status() == ConnectionStatus::Closed && !self.watch.reconnect_pending() {
            // Connection failures land in the view's last-error; the
            // result below carries them.
            let _ = self.watch.connect().await;
        }

        let view = self.watch.view();
        let is_loading = match self.watch.status() {
            ConnectionStatus::Connecting => true,
            ConnectionStatus::Open => !view.snapshot_seen(),
            ConnectionStatus::Closed => false,
        };
        let error = view.last_error().map(str::to_string);
        ResourceResult {
            data: view.snapshot_seen().then(|| view.store()),
            is_loading,
            is_error: error.is_some(),
            error,
            used: ResourceMode::Watch,
        }
    }

    async fn resolve_list(&mut self) -> ResourceResult {
        match self.fetcher.fetch(self.watch.query()).await {
            Ok(items) => ResourceResult {
                data: Some(Arc::new(Store::from_items(items))),
                ..ResourceResult::empty(ResourceMode::List)
            },
            Err(e) => ResourceResult {
                is_error: true,
                error: Some(e.to_string()),
                ..ResourceResult::empty(ResourceMode::List)
            },
        }
    }
}
