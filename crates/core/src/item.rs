// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collection items and key derivation.
//!
//! Items are opaque server-defined records. The engine only interprets the
//! well-known `metadata` sub-fields; everything else rides along untouched
//! in the flattened body. Every metadata field is optional, and key
//! derivation fails soft: a malformed item still yields a best-effort key
//! rather than crashing the engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known identifying sub-fields of an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Server-assigned unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Item name, unique within a namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Namespace the item lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Opaque, monotonically comparable revision marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

/// One element of the remote collection being mirrored.
///
/// Items are immutable snapshots pushed by the server: the store replaces
/// whole items, never edits one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub metadata: Metadata,

    /// Server-defined payload, carried verbatim.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Item {
    /// Creates an item identified by namespace and name.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Item {
            metadata: Metadata {
                namespace: Some(namespace.into()),
                name: Some(name.into()),
                ..Metadata::default()
            },
            body: Map::new(),
        }
    }

    /// Sets the unique identifier.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.metadata.uid = Some(uid.into());
        self
    }

    /// Sets the resource version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.metadata.resource_version = Some(version.into());
        self
    }

    /// Returns the derived identity for this item.
    ///
    /// The unique identifier wins when present and non-empty; otherwise the
    /// key is `"<namespace>/<name>"`, with missing parts treated as empty.
    pub fn key(&self) -> String {
        if let Some(uid) = self.metadata.uid.as_deref() {
            if !uid.is_empty() {
                return uid.to_string();
            }
        }
        let namespace = self.metadata.namespace.as_deref().unwrap_or("");
        let name = self.metadata.name.as_deref().unwrap_or("");
        format!("{namespace}/{name}")
    }

    /// Returns the item's version token, if it carries a non-empty one.
    pub fn resource_version(&self) -> Option<&str> {
        self.metadata
            .resource_version
            .as_deref()
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
