// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Logical resource coordinates and watch-URL construction.
//!
//! A [`ResourceQuery`] names the remote collection to mirror. Changing any
//! of its fields changes the logical resource identity, which obliges the
//! engine to reconnect.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default page size hint for snapshots and scroll requests.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Identifies the remote collection to mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuery {
    /// API group; `None` for the core group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// API version.
    pub version: String,

    /// Plural resource name (for example `pods`).
    pub plural: String,

    /// Namespace to scope to; `None` for all namespaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Label selector expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,

    /// Field selector expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_selector: Option<String>,

    /// Page size hint for the initial snapshot and scroll requests.
    pub limit: u32,
}

impl ResourceQuery {
    /// Creates a query for the given version and plural kind.
    pub fn new(version: impl Into<String>, plural: impl Into<String>) -> Self {
        ResourceQuery {
            group: None,
            version: version.into(),
            plural: plural.into(),
            namespace: None,
            label_selector: None,
            field_selector: None,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Scopes the query to an API group.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Scopes the query to a namespace.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Filters by label selector.
    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    /// Filters by field selector.
    pub fn with_field_selector(mut self, selector: impl Into<String>) -> Self {
        self.field_selector = Some(selector.into());
        self
    }

    /// Sets the page size hint.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Builds the transport URL for this query.
    ///
    /// `http`/`https` bases are transparently upgraded to `ws`/`wss`;
    /// `ws`/`wss` pass through. The `resumeRv` parameter is added only when
    /// a version anchor is held, so the server can replay missed events
    /// instead of resending a full snapshot; `continue` only when a
    /// continuation token survives from an interrupted snapshot.
    pub fn watch_url(
        &self,
        base: &str,
        resume_rv: Option<&str>,
        continue_token: Option<&str>,
    ) -> Result<Url> {
        let mut url =
            Url::parse(base).map_err(|e| Error::InvalidBaseUrl(format!("{base}: {e}")))?;

        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        };
        url.set_scheme(scheme)
            .map_err(|()| Error::InvalidBaseUrl(base.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(group) = &self.group {
                pairs.append_pair("group", group);
            }
            pairs.append_pair("version", &self.version);
            pairs.append_pair("plural", &self.plural);
            if let Some(namespace) = &self.namespace {
                pairs.append_pair("namespace", namespace);
            }
            if let Some(selector) = &self.label_selector {
                pairs.append_pair("labelSelector", selector);
            }
            if let Some(selector) = &self.field_selector {
                pairs.append_pair("fieldSelector", selector);
            }
            pairs.append_pair("limit", &self.limit.to_string());
            if let Some(rv) = resume_rv {
                pairs.append_pair("resumeRv", rv);
            }
            if let Some(token) = continue_token {
                pairs.append_pair("continue", token);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
